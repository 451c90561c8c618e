//! Worker configuration.

use serde::{Deserialize, Serialize};

/// Knobs for the polling worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Seconds between polls of the job table.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Retention window for terminal jobs.
    #[serde(default = "default_retain_days")]
    pub retain_days: u32,

    /// Delete a job's attachment file after it completes. Failed jobs keep
    /// theirs for inspection.
    #[serde(default)]
    pub remove_attachments: bool,

    /// Seconds between retention sweeps.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    3
}

fn default_retain_days() -> u32 {
    10
}

fn default_cleanup_interval() -> u64 {
    3600
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            retain_days: default_retain_days(),
            remove_attachments: false,
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.retain_days, 10);
        assert!(!config.remove_attachments);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: WorkerConfig =
            serde_json::from_value(serde_json::json!({"poll_interval_secs": 1})).unwrap();
        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.retain_days, 10);
    }
}
