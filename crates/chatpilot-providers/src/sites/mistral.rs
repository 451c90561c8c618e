//! Mistral's Le Chat.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

const FILE_DIALOG_INPUT: &str = "div[role=\"dialog\"] input[type=\"file\"]";

pub struct Mistral {
    selectors: Selectors,
}

impl Mistral {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "div[contenteditable=\"true\"]",
                "button[type=\"submit\"]",
                "div[data-message-part-type=\"answer\"]",
            )
            .with_file_input(FILE_DIALOG_INPUT),
        }
    }
}

impl Default for Mistral {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Mistral {
    fn id(&self) -> &'static str {
        "mistral"
    }

    fn label(&self) -> &'static str {
        "Mistral Le Chat"
    }

    fn url(&self) -> String {
        "https://chat.mistral.ai/chat".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::SelectorVisible("button[aria-label=\"Voice Mode\"]".to_string())
    }

    /// The file input only exists inside the dialog behind the Add files
    /// button.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        context
            .page
            .click_selector("button[aria-label=\"Add files\"]")
            .await?;
        context.settle_for(5_000).await;

        let timeout = context.policy.attach_file.timeout_ms as u32;
        context
            .page
            .wait_for_selector(FILE_DIALOG_INPUT, Some(timeout))
            .await?;
        context.page.set_file_input(FILE_DIALOG_INPUT, &[file]).await?;
        context.settle().await;
        Ok(())
    }

    /// The voice control reappears slightly before the final markdown pass;
    /// pad the gate.
    async fn await_completion(&self, context: &FlowContext) -> Result<(), FlowError> {
        self.completion_gate()
            .wait(&context.page, context.policy.await_completion.timeout_ms)
            .await?;
        context.settle_for(10_000).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = Mistral::new();
        assert_eq!(site.id(), "mistral");
        assert_eq!(site.selectors().file_input.as_deref(), Some(FILE_DIALOG_INPUT));
    }
}
