//! File input handling.

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;
use crate::session::PageSession;

impl PageSession {
    /// Attach local files to a `<input type="file">` element.
    ///
    /// This bypasses the native file chooser entirely: the browser treats the
    /// paths as if the user had picked them in the dialog. Paths must be
    /// absolute and visible to the browser process.
    pub async fn set_file_input(&self, selector: &str, files: &[String]) -> Result<(), CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;

        self.call(
            "DOM.setFileInputFiles",
            Some(json!({
                "files": files,
                "nodeId": node_id,
            })),
        )
        .await?;

        debug!("Set {} file(s) on {}", files.len(), selector);
        Ok(())
    }
}
