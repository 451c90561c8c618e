//! DuckDuckGo AI Chat (duck.ai).

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

use crate::actions;

pub struct DuckDuckGo {
    selectors: Selectors,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "textarea[name=\"user-prompt\"]",
                "main button[type=\"submit\"]",
                "main div[data-activeresponse=\"true\"] p",
            ),
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for DuckDuckGo {
    fn id(&self) -> &'static str {
        "duckduckgo"
    }

    fn label(&self) -> &'static str {
        "DuckDuckGo AI Chat"
    }

    fn url(&self) -> String {
        "https://duckduckgo.com/?q=DuckDuckGo+AI+Chat&ia=chat&duckai=1".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // While streaming, the in-progress turn is marked inactive
        CompletionGate::SelectorAbsent("main div[data-activeresponse=\"false\"] span".to_string())
    }

    /// First visits stack intro/consent dialogs; click through them all.
    async fn authenticate(&self, context: &FlowContext) -> Result<(), FlowError> {
        actions::click_until_gone(
            &context.page,
            "div[role=\"presentation\"] button",
            10_000,
            500,
        )
        .await?;
        context.settle().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = DuckDuckGo::new();
        assert_eq!(site.id(), "duckduckgo");
        assert!(site.url().contains("duckai=1"));
        assert!(matches!(
            site.completion_gate(),
            CompletionGate::SelectorAbsent(_)
        ));
    }
}
