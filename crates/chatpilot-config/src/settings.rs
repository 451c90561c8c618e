//! Settings schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub browser: BrowserSettings,

    #[serde(default)]
    pub artifacts: ArtifactSettings,

    #[serde(default)]
    pub queue: QueueSettings,

    #[serde(default)]
    pub flow: FlowSettings,

    #[serde(default)]
    pub google: GoogleSettings,

    #[serde(default)]
    pub providers: HashMap<String, ProviderEntry>,
}

impl Settings {
    /// Queue database path, `~` expanded.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(ConfigLoader::expand_path(&self.queue.db_path))
    }

    /// Artifact directory, `~` expanded. The `CHATPILOT_ARTIFACTS`
    /// environment variable overrides the configured directory.
    pub fn artifacts_dir(&self) -> PathBuf {
        let dir = std::env::var("CHATPILOT_ARTIFACTS").unwrap_or_else(|_| self.artifacts.dir.clone());
        PathBuf::from(ConfigLoader::expand_path(&dir))
    }
}

/// Browser debugging endpoint. The browser process itself is managed
/// elsewhere; ChatPilot only connects to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9222".to_string()
}

/// Screenshot artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_artifacts_dir")]
    pub dir: String,

    #[serde(default = "default_true")]
    pub capture: bool,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            capture: default_true(),
        }
    }
}

fn default_artifacts_dir() -> String {
    "~/.chatpilot/artifacts".to_string()
}

/// Job queue and worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSettings {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retain_days")]
    pub retain_days: u32,

    #[serde(default)]
    pub remove_attachments: bool,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            poll_interval_secs: default_poll_interval(),
            max_attempts: default_max_attempts(),
            retain_days: default_retain_days(),
            remove_attachments: false,
        }
    }
}

fn default_db_path() -> String {
    "~/.chatpilot/jobs.db".to_string()
}

fn default_poll_interval() -> u64 {
    3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retain_days() -> u32 {
    10
}

/// Overrides layered on top of each provider's flow policy. Absent fields
/// keep the provider's own budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowSettings {
    pub settle_ms: Option<u64>,
    pub navigate_timeout_ms: Option<u64>,
    pub upload_timeout_ms: Option<u64>,
    pub completion_timeout_ms: Option<u64>,
}

/// Google account for sites behind a Google login. Usually written as
/// `${GOOGLE_EMAIL}` / `${GOOGLE_PASSWORD}` and expanded from the
/// environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleSettings {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Per-provider knobs, keyed by provider id under `[providers.<id>]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// JSON cookie file injected before navigation.
    pub cookie_file: Option<String>,

    /// Model variant where the site exposes a picker.
    pub model: Option<String>,

    /// Knobs a site module may read without a schema change.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

impl ProviderEntry {
    /// Cookie file path, `~` expanded.
    pub fn cookie_file_path(&self) -> Option<PathBuf> {
        self.cookie_file
            .as_deref()
            .map(|p| PathBuf::from(ConfigLoader::expand_path(p)))
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_runnable() {
        let settings = Settings::default();
        assert_eq!(settings.browser.endpoint, "http://127.0.0.1:9222");
        assert!(settings.artifacts.capture);
        assert_eq!(settings.queue.poll_interval_secs, 3);
        assert_eq!(settings.queue.max_attempts, 3);
        assert_eq!(settings.queue.retain_days, 10);
        assert!(!settings.queue.remove_attachments);
        assert!(settings.providers.is_empty());
        assert!(settings.google.email.is_none());
    }

    #[test]
    fn test_db_path_expands_tilde() {
        let settings = Settings::default();
        let path = settings.db_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with(".chatpilot/jobs.db"));
    }

    #[test]
    fn test_flow_overrides_default_to_none() {
        let flow = FlowSettings::default();
        assert!(flow.settle_ms.is_none());
        assert!(flow.completion_timeout_ms.is_none());
    }

    #[test]
    fn test_provider_entry_cookie_path() {
        let entry = ProviderEntry {
            cookie_file: Some("~/cookies/grok.json".to_string()),
            ..Default::default()
        };
        let path = entry.cookie_file_path().unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("cookies/grok.json"));
    }
}
