//! Google Search's AI Mode.

use async_trait::async_trait;
use chatpilot_flow::{
    truncate_at_disclaimer, ChatProvider, ChatReply, ChatRequest, CompletionGate, FlowContext,
    FlowError, OutputFormat, Selectors,
};

use crate::actions;

const DISCLAIMER: &str = "AI responses may include mistakes";

pub struct AiMode {
    selectors: Selectors,
}

impl AiMode {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "textarea",
                "button[aria-label=\"Send\"]",
                "div[data-container-id=\"main-col\"]",
            )
            .with_file_input("button[aria-label=\"Upload image\"] input[type=\"file\"]"),
        }
    }
}

impl Default for AiMode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for AiMode {
    fn id(&self) -> &'static str {
        "aimode"
    }

    fn label(&self) -> &'static str {
        "Google AI Mode"
    }

    fn url(&self) -> String {
        "https://www.google.com".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // The answer column streams without a terminal marker
        CompletionGate::Settled { ms: 15_000 }
    }

    /// AI Mode hides behind an entry control on the results page, labeled
    /// only by its caption.
    async fn authenticate(&self, context: &FlowContext) -> Result<(), FlowError> {
        actions::click_text(&context.page, "button, div[role=\"button\"]", "AI Mode").await?;
        context.settle().await;
        Ok(())
    }

    /// The column ends with a boilerplate disclaimer; cut it off.
    fn post_process(&self, request: &ChatRequest, raw: &str) -> Result<ChatReply, FlowError> {
        let text = truncate_at_disclaimer(raw, DISCLAIMER);
        let text = text.trim().to_string();
        match request.output {
            OutputFormat::Text => Ok(ChatReply::text(text)),
            OutputFormat::Json => {
                let json = chatpilot_flow::json_from_reply(&text)?;
                Ok(ChatReply::json(text, json))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = AiMode::new();
        assert_eq!(site.id(), "aimode");
        assert!(matches!(site.completion_gate(), CompletionGate::Settled { .. }));
    }

    #[test]
    fn test_disclaimer_stripped() {
        let site = AiMode::new();
        let request = ChatRequest::new("q");
        let raw = "Paris is the capital of France.\n\nAI responses may include mistakes. Learn more";
        let reply = site.post_process(&request, raw).unwrap();
        assert_eq!(reply.text, "Paris is the capital of France.");
    }
}
