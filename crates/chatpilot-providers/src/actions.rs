//! Shared page actions for controls without stable selectors.
//!
//! Several sites hang behavior off buttons that carry no aria-label, id, or
//! data attribute — only a visible caption. These helpers run the text match
//! inside the page, where `innerText` is cheap.

use chatpilot_cdp::{js_string, PageSession};
use chatpilot_flow::{CdpError, FlowError};

/// Click the first match of `selector` whose rendered text contains `text`.
pub async fn click_text(page: &PageSession, selector: &str, text: &str) -> Result<(), FlowError> {
    let js = format!(
        "(() => {{ for (const el of document.querySelectorAll({})) {{ \
         if ((el.innerText || '').includes({})) {{ el.click(); return true; }} }} \
         return false; }})()",
        js_string(selector),
        js_string(text)
    );
    match page.evaluate(&js).await?.as_bool() {
        Some(true) => Ok(()),
        _ => Err(CdpError::ElementNotFound(format!("{selector} with text {text:?}")).into()),
    }
}

/// Keep clicking matches of `selector` until none are left or the deadline
/// passes. Stacked consent/intro dialogs are dismissed this way.
pub async fn click_until_gone(
    page: &PageSession,
    selector: &str,
    timeout_ms: u64,
    pause_ms: u64,
) -> Result<(), FlowError> {
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(timeout_ms);
    while std::time::Instant::now() < deadline {
        if page.query_selector(selector).await?.is_none() {
            return Ok(());
        }
        if page.click_selector(selector).await.is_err() {
            // The node went away between the query and the click
            return Ok(());
        }
        tokio::time::sleep(std::time::Duration::from_millis(pause_ms)).await;
    }
    Ok(())
}
