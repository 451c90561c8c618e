//! Perplexity.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

const SUBMIT_BUTTON: &str = "button[data-testid=\"submit-button\"]";

pub struct Perplexity {
    selectors: Selectors,
}

impl Perplexity {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "#ask-input",
                SUBMIT_BUTTON,
                "div[id*=\"markdown-content\"]",
            )
            .with_file_input("input[type=\"file\"]"),
        }
    }
}

impl Default for Perplexity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Perplexity {
    fn id(&self) -> &'static str {
        "perplexity"
    }

    fn label(&self) -> &'static str {
        "Perplexity"
    }

    fn url(&self) -> String {
        "https://www.perplexity.ai".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // The submit control is swapped out while the answer streams
        CompletionGate::SelectorVisible(SUBMIT_BUTTON.to_string())
    }

    /// The attach button reveals the file input; a thumbnail or the cancel
    /// control confirms the upload landed.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        context
            .page
            .wait_for_selector("button[aria-label=\"Attach files\"]", Some(10_000))
            .await?;
        context
            .page
            .click_selector("button[aria-label=\"Attach files\"]")
            .await?;
        context.settle().await;

        let input = "input[type=\"file\"]";
        let timeout = context.policy.attach_file.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.set_file_input(input, &[file]).await?;

        context
            .page
            .wait_for_selector("button[aria-label=\"Cancel upload\"], img", Some(20_000))
            .await?;
        context.settle().await;
        Ok(())
    }
}
