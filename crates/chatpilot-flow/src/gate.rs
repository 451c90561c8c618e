//! Completion gates: the DOM condition that marks a reply as finished.
//!
//! Each provider signals completion differently — an idle control coming
//! back, a stop button going away, a status label reaching a terminal
//! string, or nothing at all. The gate vocabulary below covers every site
//! in the catalog; each variant compiles to a boolean JavaScript condition
//! polled against the page.

use chatpilot_cdp::{js_string, CdpError, PageSession};

/// The provider-specific completion signal.
#[derive(Debug, Clone)]
pub enum CompletionGate {
    /// A node appears and has layout (e.g. the Run/Send control re-enabling).
    SelectorVisible(String),
    /// A busy node loses its layout or leaves the DOM (e.g. a Stop button).
    SelectorHidden(String),
    /// No node matches at all (e.g. in-progress markers).
    SelectorAbsent(String),
    /// A status label's text reaches a terminal value.
    TextEquals { selector: String, text: String },
    /// Some match of the selector contains the text and has layout. For
    /// controls that carry no stable attribute, only a visible caption.
    TextVisible { selector: String, text: String },
    /// A raw JS condition, for signals the structured variants can't say.
    Expression(String),
    /// No signal exists; wait a fixed quiet period.
    Settled { ms: u64 },
}

impl CompletionGate {
    /// The JS condition this gate polls, if any.
    ///
    /// Visibility is judged by client rects rather than `offsetParent` so
    /// fixed-position toolbars count as visible.
    pub fn js_condition(&self) -> Option<String> {
        match self {
            CompletionGate::SelectorVisible(sel) => Some(format!(
                "(() => {{ const el = document.querySelector({}); \
                 return !!el && el.getClientRects().length > 0; }})()",
                js_string(sel)
            )),
            CompletionGate::SelectorHidden(sel) => Some(format!(
                "(() => {{ const el = document.querySelector({}); \
                 return !el || el.getClientRects().length === 0; }})()",
                js_string(sel)
            )),
            CompletionGate::SelectorAbsent(sel) => Some(format!(
                "!document.querySelector({})",
                js_string(sel)
            )),
            CompletionGate::TextEquals { selector, text } => Some(format!(
                "(() => {{ const el = document.querySelector({}); \
                 return !!el && el.innerText.trim() === {}; }})()",
                js_string(selector),
                js_string(text)
            )),
            CompletionGate::TextVisible { selector, text } => Some(format!(
                "(() => {{ for (const el of document.querySelectorAll({})) {{ \
                 if ((el.innerText || '').includes({}) && el.getClientRects().length > 0) \
                 return true; }} return false; }})()",
                js_string(selector),
                js_string(text)
            )),
            CompletionGate::Expression(expr) => Some(expr.clone()),
            CompletionGate::Settled { .. } => None,
        }
    }

    /// Block until the gate opens or the timeout lapses.
    pub async fn wait(&self, page: &PageSession, timeout_ms: u64) -> Result<(), CdpError> {
        match self {
            CompletionGate::Settled { ms } => {
                let quiet = (*ms).min(timeout_ms);
                tokio::time::sleep(std::time::Duration::from_millis(quiet)).await;
                Ok(())
            }
            _ => {
                // js_condition is Some for every non-Settled variant
                let condition = self.js_condition().unwrap_or_else(|| "true".to_string());
                page.wait_for_condition(&condition, timeout_ms).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_condition() {
        let gate = CompletionGate::SelectorVisible("button[aria-label=\"Run\"]".to_string());
        let js = gate.js_condition().unwrap();
        assert!(js.contains("getClientRects().length > 0"));
        assert!(js.contains(r#"button[aria-label=\"Run\"]"#));
    }

    #[test]
    fn test_hidden_condition() {
        let gate = CompletionGate::SelectorHidden("button[aria-label=\"Stop response\"]".to_string());
        let js = gate.js_condition().unwrap();
        assert!(js.contains("!el || el.getClientRects().length === 0"));
    }

    #[test]
    fn test_absent_condition() {
        let gate = CompletionGate::SelectorAbsent("main div[data-activeresponse=\"false\"] span".to_string());
        let js = gate.js_condition().unwrap();
        assert!(js.starts_with("!document.querySelector"));
    }

    #[test]
    fn test_text_equals_condition() {
        let gate = CompletionGate::TextEquals {
            selector: ".answering-label".to_string(),
            text: "Finished".to_string(),
        };
        let js = gate.js_condition().unwrap();
        assert!(js.contains(".answering-label"));
        assert!(js.contains("\"Finished\""));
        assert!(js.contains("innerText.trim()"));
    }

    #[test]
    fn test_text_visible_condition() {
        let gate = CompletionGate::TextVisible {
            selector: "button".to_string(),
            text: "Show Code".to_string(),
        };
        let js = gate.js_condition().unwrap();
        assert!(js.contains("querySelectorAll(\"button\")"));
        assert!(js.contains("includes(\"Show Code\")"));
        assert!(js.contains("getClientRects().length > 0"));
    }

    #[test]
    fn test_expression_passes_through() {
        let gate = CompletionGate::Expression("document.title === 'done'".to_string());
        assert_eq!(gate.js_condition().unwrap(), "document.title === 'done'");
    }

    #[test]
    fn test_settled_has_no_condition() {
        let gate = CompletionGate::Settled { ms: 5000 };
        assert!(gate.js_condition().is_none());
    }
}
