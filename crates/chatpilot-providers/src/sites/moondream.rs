//! MoonDream playground, used in Caption mode.
//!
//! The playground takes no typed prompt for captions: upload an image,
//! switch to Caption mode, run. The prompt text of the request is ignored
//! by the page; system/user prompts only survive into the job record.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

use crate::actions;

const UPLOAD_CONFIRM: &str = "#image-container button[type=\"button\"]";

pub struct MoonDream {
    selectors: Selectors,
}

impl MoonDream {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "button[type=\"button\"]",
                "#playground-form button[data-slot=\"button\"] svg",
                "main div.break-words",
            )
            .with_file_input("input[type=\"file\"]"),
        }
    }
}

impl Default for MoonDream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MoonDream {
    fn id(&self) -> &'static str {
        "moondream"
    }

    fn label(&self) -> &'static str {
        "MoonDream"
    }

    fn url(&self) -> String {
        "https://moondream.ai/c/playground".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // A "Show Code" control appears next to the finished caption
        CompletionGate::TextVisible {
            selector: "button".to_string(),
            text: "Show Code".to_string(),
        }
    }

    /// Upload, then confirm the staged image.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        let input = "input[type=\"file\"]";
        let timeout = context.policy.attach_file.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.set_file_input(input, &[file]).await?;

        context.page.wait_for_selector(UPLOAD_CONFIRM, Some(timeout)).await?;
        context.page.click_selector(UPLOAD_CONFIRM).await?;
        context.settle().await;
        Ok(())
    }

    /// No prompt box: select Caption mode instead. The mode buttons carry
    /// no stable attribute, only their caption.
    async fn fill_prompt(&self, context: &FlowContext, _text: &str) -> Result<(), FlowError> {
        actions::click_text(&context.page, "button[type=\"button\"]", "Caption").await?;
        context.settle().await;
        Ok(())
    }
}
