use std::path::PathBuf;

use crate::google_auth::GoogleCredentials;

/// Per-provider knobs loaded from configuration.
///
/// Every field is optional; a provider built from `ProviderSettings::default()`
/// runs with its baked-in URL, model, and an anonymous session.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// JSON cookie file injected before navigation, for sites that gate the
    /// chat behind a logged-in session.
    pub cookie_file: Option<PathBuf>,
    /// Model variant to select where the site exposes a picker.
    pub model: Option<String>,
    /// Google account for sites reached through "Continue with Google".
    pub google: Option<GoogleCredentials>,
}

impl ProviderSettings {
    pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_google(mut self, credentials: GoogleCredentials) -> Self {
        self.google = Some(credentials);
        self
    }
}
