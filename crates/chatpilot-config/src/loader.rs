//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::settings::Settings;

/// Loads [`Settings`] from TOML with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load settings from a file, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Settings, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        Self::load(path)
    }

    /// Load settings from a string.
    pub fn load_str(content: &str) -> Result<Settings, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let settings: Settings = toml::from_str(&expanded)?;
        Ok(settings)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.chatpilot`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let settings = ConfigLoader::load_str("").unwrap();
        assert_eq!(settings.browser.endpoint, "http://127.0.0.1:9222");
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [browser]
            endpoint = "http://10.0.0.5:9222"

            [queue]
            poll_interval_secs = 1
            max_attempts = 5
        "#;
        let settings = ConfigLoader::load_str(content).unwrap();
        assert_eq!(settings.browser.endpoint, "http://10.0.0.5:9222");
        assert_eq!(settings.queue.poll_interval_secs, 1);
        assert_eq!(settings.queue.max_attempts, 5);
        // Untouched sections keep their defaults
        assert_eq!(settings.queue.retain_days, 10);
        assert!(settings.artifacts.capture);
    }

    #[test]
    fn test_load_flow_overrides() {
        let content = r#"
            [flow]
            settle_ms = 500
            completion_timeout_ms = 3600000
        "#;
        let settings = ConfigLoader::load_str(content).unwrap();
        assert_eq!(settings.flow.settle_ms, Some(500));
        assert_eq!(settings.flow.completion_timeout_ms, Some(3_600_000));
        assert!(settings.flow.navigate_timeout_ms.is_none());
    }

    #[test]
    fn test_load_providers() {
        let content = r#"
            [providers.grok]
            cookie_file = "~/cookies/grok.json"

            [providers.gemini]
            model = "2.5 Pro"
            theme = "dark"
        "#;
        let settings = ConfigLoader::load_str(content).unwrap();
        assert_eq!(
            settings.providers["grok"].cookie_file.as_deref(),
            Some("~/cookies/grok.json")
        );
        assert_eq!(settings.providers["gemini"].model.as_deref(), Some("2.5 Pro"));
        assert_eq!(settings.providers["gemini"].extra["theme"], "dark");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[browser]").unwrap();
        writeln!(file, "endpoint = \"http://localhost:9333\"").unwrap();

        let settings = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(settings.browser.endpoint, "http://localhost:9333");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(settings.browser.endpoint, "http://127.0.0.1:9222");
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("CHATPILOT_TEST_EMAIL", "pilot@example.com");
        }
        let content = "[google]\nemail = \"${CHATPILOT_TEST_EMAIL}\"";
        let settings = ConfigLoader::load_str(content).unwrap();
        assert_eq!(settings.google.email.as_deref(), Some("pilot@example.com"));
        unsafe {
            std::env::remove_var("CHATPILOT_TEST_EMAIL");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "[google]\nemail = \"${CHATPILOT_NO_SUCH_VAR_9321}\"";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.chatpilot");
        assert!(!expanded.starts_with('~'));

        let absolute = ConfigLoader::expand_path("/var/lib/chatpilot");
        assert_eq!(absolute, "/var/lib/chatpilot");
    }
}
