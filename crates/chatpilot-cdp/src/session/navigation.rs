//! Navigation and wait primitives.
//!
//! All waits are bounded polls: a fixed 100ms probe interval against a hard
//! deadline. Chat UIs render asynchronously long after the load event, so
//! the completion signals are DOM conditions, not navigation lifecycle
//! events.

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;
use crate::session::PageSession;

const POLL_INTERVAL_MS: u64 = 100;

impl PageSession {
    /// Navigate to URL and wait for the document to load.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();

        self.wait_for_load().await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for `document.readyState` to reach interactive/complete.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_secs(30);

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// Reload page.
    pub async fn reload(&self) -> Result<(), CdpError> {
        self.call("Page.reload", None).await?;
        self.wait_for_load().await?;
        Ok(())
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    // ========================================================================
    // Wait Operations
    // ========================================================================

    /// Wait for selector to appear. Returns its node ID.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout_ms: Option<u32>,
    ) -> Result<i64, CdpError> {
        let timeout = std::time::Duration::from_millis(timeout_ms.unwrap_or(30000) as u64);
        let start = std::time::Instant::now();

        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                return Ok(node_id);
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// Wait for selector to match nothing (a busy indicator going away).
    pub async fn wait_for_selector_gone(
        &self,
        selector: &str,
        timeout_ms: Option<u32>,
    ) -> Result<(), CdpError> {
        let timeout = std::time::Duration::from_millis(timeout_ms.unwrap_or(30000) as u64);
        let start = std::time::Instant::now();

        loop {
            if self.query_selector(selector).await?.is_none() {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' to disappear timed out",
                    selector
                )));
            }

            tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// Wait until a JavaScript expression evaluates to `true`.
    ///
    /// JS exceptions are treated as "not yet": half-rendered pages throw on
    /// nodes that do not exist yet, and that is exactly the state being
    /// waited out.
    pub async fn wait_for_condition(
        &self,
        expression: &str,
        timeout_ms: u64,
    ) -> Result<(), CdpError> {
        let timeout = std::time::Duration::from_millis(timeout_ms);
        let start = std::time::Instant::now();

        loop {
            match self.evaluate(expression).await {
                Ok(value) if value.as_bool() == Some(true) => return Ok(()),
                Ok(_) => {}
                Err(CdpError::JavaScript(_)) => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Condition not met within {}ms: {}",
                    timeout_ms, expression
                )));
            }

            tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }
}
