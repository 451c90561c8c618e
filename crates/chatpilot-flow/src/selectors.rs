//! Per-provider selector tables.

use chatpilot_cdp::Pick;

/// The DOM handles a provider workflow needs.
///
/// These strings are the contract with the target site, and they break when
/// the site ships new markup. Keeping them in one value per provider makes
/// the breakage a one-file fix.
#[derive(Debug, Clone)]
pub struct Selectors {
    /// Prompt input: textarea, input, or contenteditable.
    pub input: String,
    /// Submit control.
    pub send_button: String,
    /// Node(s) carrying the rendered reply.
    pub result: String,
    /// `input[type="file"]` for uploads, when the provider has one.
    pub file_input: Option<String>,
}

impl Selectors {
    pub fn new(
        input: impl Into<String>,
        send_button: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            send_button: send_button.into(),
            result: result.into(),
            file_input: None,
        }
    }

    pub fn with_file_input(mut self, selector: impl Into<String>) -> Self {
        self.file_input = Some(selector.into());
        self
    }
}

/// How to read the reply out of the page.
#[derive(Debug, Clone)]
pub struct ExtractRule {
    pub selector: String,
    pub pick: Pick,
}

impl ExtractRule {
    pub fn new(selector: impl Into<String>, pick: Pick) -> Self {
        Self {
            selector: selector.into(),
            pick,
        }
    }

    /// The common case: the newest message under the result selector.
    pub fn last(selector: impl Into<String>) -> Self {
        Self::new(selector, Pick::Last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_builder() {
        let s = Selectors::new("#ask-input", "button[type=submit]", ".reply")
            .with_file_input("input[type=file]");
        assert_eq!(s.input, "#ask-input");
        assert_eq!(s.file_input.as_deref(), Some("input[type=file]"));
    }

    #[test]
    fn test_selectors_no_file_input_by_default() {
        let s = Selectors::new("a", "b", "c");
        assert!(s.file_input.is_none());
    }

    #[test]
    fn test_extract_rule_last() {
        let rule = ExtractRule::last("message-content");
        assert_eq!(rule.selector, "message-content");
        assert_eq!(rule.pick, Pick::Last);
    }
}
