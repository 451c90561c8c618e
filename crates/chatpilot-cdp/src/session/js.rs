//! JavaScript evaluation.

use serde_json::{json, Value};

use crate::error::CdpError;
use crate::session::PageSession;

/// Quote a Rust string as a JavaScript string literal.
///
/// Selectors are full of double quotes (`button[aria-label="Ask"]`), so any
/// expression embedding one must go through here.
pub fn js_string(s: &str) -> String {
    // serde_json string encoding is valid JS source
    Value::String(s.to_string()).to_string()
}

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }
}
