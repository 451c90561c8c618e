//! Network-domain helpers: cookie injection.

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;
use crate::protocol::Cookie;
use crate::session::PageSession;

impl PageSession {
    /// Install cookies before navigating.
    ///
    /// Used to carry a logged-in session into providers that gate their chat
    /// behind authentication (a cookie file exported from a manual login).
    pub async fn set_cookies(&self, cookies: &[Cookie]) -> Result<(), CdpError> {
        if cookies.is_empty() {
            return Ok(());
        }

        self.call("Network.setCookies", Some(json!({"cookies": cookies})))
            .await?;

        debug!("Installed {} cookie(s)", cookies.len());
        Ok(())
    }
}
