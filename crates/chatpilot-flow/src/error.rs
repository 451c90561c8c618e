//! Flow error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::policy::FlowStep;
use chatpilot_cdp::CdpError;

/// Errors from running a chat workflow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Browser-level failure.
    #[error("Browser error: {0}")]
    Cdp(#[from] CdpError),

    /// A step ran out of its policy budget.
    #[error("Step {step} timed out after {timeout_ms}ms")]
    StepTimeout { step: FlowStep, timeout_ms: u64 },

    /// A step failed on its final attempt.
    #[error("Step {step} failed after {attempts} attempt(s): {source}")]
    StepFailed {
        step: FlowStep,
        attempts: u32,
        #[source]
        source: Box<FlowError>,
    },

    /// The request carries an attachment but the provider takes none.
    #[error("Provider does not accept file attachments")]
    NoFileInput,

    /// The attachment path does not exist.
    #[error("Attachment not found: {0}")]
    AttachmentNotFound(PathBuf),

    /// The result node rendered nothing.
    #[error("Provider returned an empty result")]
    EmptyResult,

    /// JSON that stayed broken through the repair chain.
    #[error("JSON parse error: {0}")]
    Json(String),

    /// File I/O failure (artifacts, attachments, cookie files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlowError::StepTimeout {
            step: FlowStep::AwaitCompletion,
            timeout_ms: 15000,
        };
        assert_eq!(err.to_string(), "Step await_completion timed out after 15000ms");

        let err = FlowError::NoFileInput;
        assert!(err.to_string().contains("file attachments"));

        let err = FlowError::AttachmentNotFound(PathBuf::from("/tmp/missing.png"));
        assert!(err.to_string().contains("/tmp/missing.png"));
    }

    #[test]
    fn test_step_failed_wraps_source() {
        let inner = FlowError::EmptyResult;
        let err = FlowError::StepFailed {
            step: FlowStep::ExtractResult,
            attempts: 3,
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.contains("extract_result"));
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("empty result"));
    }

    #[test]
    fn test_cdp_conversion() {
        let err: FlowError = CdpError::SessionClosed.into();
        assert!(matches!(err, FlowError::Cdp(_)));
    }
}
