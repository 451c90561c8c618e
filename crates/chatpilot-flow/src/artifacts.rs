use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chatpilot_cdp::{PageSession, ScreenshotFormat};
use tracing::{debug, warn};

use crate::error::FlowError;

/// Writes page screenshots for a single flow run.
///
/// Captures are diagnostics, not results: a failed capture is logged and
/// swallowed so it can never fail the flow it is documenting. File names are
/// deterministic (`<slug>-<label>.png`), so a rerun with the same slug
/// overwrites the previous run's captures.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    dir: Option<PathBuf>,
    slug: String,
}

impl ArtifactSink {
    pub fn new(dir: impl Into<PathBuf>, slug: impl Into<String>) -> Self {
        Self {
            dir: Some(dir.into()),
            slug: slug.into(),
        }
    }

    /// A sink that drops every capture.
    pub fn disabled() -> Self {
        Self {
            dir: None,
            slug: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Screenshot the page and write it as `<slug>-<label>.png`.
    ///
    /// Returns the written path, or `None` when the sink is disabled or the
    /// capture failed.
    pub async fn capture(&self, page: &PageSession, label: &str) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;
        match self.try_capture(dir, page, label).await {
            Ok(path) => {
                debug!(path = %path.display(), "Captured page screenshot");
                Some(path)
            }
            Err(e) => {
                warn!(label, error = %e, "Screenshot capture failed");
                None
            }
        }
    }

    async fn try_capture(
        &self,
        dir: &Path,
        page: &PageSession,
        label: &str,
    ) -> Result<PathBuf, FlowError> {
        tokio::fs::create_dir_all(dir).await?;
        let encoded = page.screenshot(ScreenshotFormat::Png, None, false, None).await?;
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let path = dir.join(format!("{}-{}.png", self.slug, label));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_sink() {
        let sink = ArtifactSink::disabled();
        assert!(!sink.is_enabled());
    }

    #[test]
    fn test_enabled_sink() {
        let sink = ArtifactSink::new("/tmp/artifacts", "grok");
        assert!(sink.is_enabled());
    }
}
