//! Chrome DevTools Protocol client for ChatPilot.
//!
//! Connects to an already-running Chrome/Chromium with remote debugging
//! enabled and talks CDP JSON-RPC over WebSocket. Browser process management
//! is deliberately out of scope: something else (a container, a user, a
//! supervisor) owns the browser; this crate only attaches to its endpoint.
//!
//! ## Usage
//!
//! 1. Have Chrome running with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Attach and drive a page:
//!    ```rust,ignore
//!    let client = CdpClient::connect("http://localhost:9222").await?;
//!    let page = client.new_page(Some("https://gemini.google.com")).await?;
//!    page.fill("textarea", "hello").await?;
//!    ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::{js_string, PageSession, Pick};
