//! Queue errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Invalid job status: {0}")]
    InvalidStatus(String),

    #[error("Store is closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio_rusqlite::Error> for QueueError {
    fn from(e: tokio_rusqlite::Error) -> Self {
        match e {
            tokio_rusqlite::Error::ConnectionClosed => QueueError::Closed,
            other => QueueError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueueError::NotFound("abc-123".to_string());
        assert!(err.to_string().contains("abc-123"));

        let err = QueueError::InvalidStatus("sleeping".to_string());
        assert!(err.to_string().contains("sleeping"));
    }

    #[test]
    fn test_closed_connection_from() {
        let err = QueueError::from(tokio_rusqlite::Error::ConnectionClosed);
        assert!(matches!(err, QueueError::Closed));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = QueueError::from(io);
        assert!(err.to_string().contains("gone"));
    }
}
