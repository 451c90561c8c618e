//! Meta AI.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Pick, Selectors};

const ATTACH_BUTTON: &str = "div[aria-label=\"Attach a file or edit a video\"]";
const SEND_BUTTON: &str = "div[aria-label=\"Send message\"]";

pub struct Meta {
    selectors: Selectors,
}

impl Meta {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new("div[role=\"textbox\"]", SEND_BUTTON, "div[dir=\"auto\"]")
                .with_file_input("input[type=\"file\"]"),
        }
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Meta {
    fn id(&self) -> &'static str {
        "meta"
    }

    fn label(&self) -> &'static str {
        "Meta AI"
    }

    fn url(&self) -> String {
        "https://www.meta.ai".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::SelectorVisible(SEND_BUTTON.to_string())
    }

    /// The attach menu has to be opened, Upload picked from it, and the
    /// menu reopened before the file input accepts anything.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        context.page.click_selector(ATTACH_BUTTON).await?;
        context.settle().await;
        context
            .page
            .click_selector_pick("div[role=\"menuitem\"]", Pick::Last)
            .await?;
        context.settle().await;
        context.page.click_selector(ATTACH_BUTTON).await?;
        context.settle().await;

        let input = "input[type=\"file\"]";
        let timeout = context.policy.attach_file.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.set_file_input(input, &[file]).await?;
        context.settle().await;
        Ok(())
    }

    /// The send control stays disabled while an upload is still processing;
    /// wait for it before clicking.
    async fn submit_prompt(&self, context: &FlowContext) -> Result<(), FlowError> {
        let text = self.composed_prompt(&context.request);
        context.settle_for(2_000).await;
        self.fill_prompt(context, &text).await?;
        context.settle().await;

        context.page.wait_for_selector(SEND_BUTTON, Some(20_000)).await?;
        context.page.click_selector(SEND_BUTTON).await?;
        context.settle().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = Meta::new();
        assert_eq!(site.id(), "meta");
        assert_eq!(site.selectors().send_button, SEND_BUTTON);
        assert!(site.selectors().file_input.is_some());
    }
}
