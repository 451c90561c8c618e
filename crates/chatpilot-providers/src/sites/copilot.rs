//! Microsoft Copilot.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

pub struct Copilot {
    selectors: Selectors,
}

impl Copilot {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "textarea#userInput",
                "button[aria-label=\"Submit message\"]",
                "div[data-content=\"ai-message\"] p",
            ),
        }
    }
}

impl Default for Copilot {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Copilot {
    fn id(&self) -> &'static str {
        "copilot"
    }

    fn label(&self) -> &'static str {
        "Microsoft Copilot"
    }

    fn url(&self) -> String {
        "https://copilot.microsoft.com".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // The voice entry point comes back once the reply stops streaming
        CompletionGate::SelectorVisible("button[aria-label=\"Talk to Copilot\"]".to_string())
    }

    /// The reply is split over one `<p>` per paragraph; join them all.
    async fn extract_result(&self, context: &FlowContext) -> Result<String, FlowError> {
        let selector = &self.selectors.result;
        let timeout = context.policy.extract_result.timeout_ms as u32;
        context.page.wait_for_selector(selector, Some(timeout)).await?;

        let paragraphs = context.page.inner_texts(selector).await?;
        let text = paragraphs.join("\n");
        let text = text.trim();
        if text.is_empty() {
            return Err(FlowError::EmptyResult);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = Copilot::new();
        assert_eq!(site.id(), "copilot");
        assert_eq!(site.selectors().input, "textarea#userInput");
        assert!(matches!(
            site.completion_gate(),
            CompletionGate::SelectorVisible(_)
        ));
    }
}
