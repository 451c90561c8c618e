//! Pallyy's image description generator.
//!
//! A single-purpose form, not a chat: one image, one short hint, one
//! generated paragraph. The result paragraph carries no selector of its
//! own; it is found relative to the Copy control beside it.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, ChatRequest, CompletionGate, FlowContext, FlowError, Selectors};

pub struct Pally {
    selectors: Selectors,
}

impl Pally {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "input[name=\"description\"]",
                "button[type=\"submit\"]",
                "p",
            )
            .with_file_input("input[type=\"file\"]"),
        }
    }
}

impl Default for Pally {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Pally {
    fn id(&self) -> &'static str {
        "pally"
    }

    fn label(&self) -> &'static str {
        "Pallyy"
    }

    fn url(&self) -> String {
        "https://pallyy.com/tools/image-description-generator".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::TextVisible {
            selector: "button".to_string(),
            text: "Copy".to_string(),
        }
    }

    /// The hint field is a short single-line input; system instructions
    /// would only pollute it.
    fn composed_prompt(&self, request: &ChatRequest) -> String {
        request.prompt.clone()
    }

    /// Upload straight into the hidden input, then wait for the remove
    /// link that confirms the image was accepted.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        let input = "input[type=\"file\"]";
        let timeout = context.policy.attach_file.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.set_file_input(input, &[file]).await?;
        context
            .page
            .wait_for_selector("a[href=\"#remove\"]", Some(15_000))
            .await?;
        context.settle().await;
        Ok(())
    }

    /// Read the paragraph that precedes the Copy control.
    async fn extract_result(&self, context: &FlowContext) -> Result<String, FlowError> {
        let js = "(() => { \
            const copy = Array.from(document.querySelectorAll('button')) \
                .find(b => (b.innerText || '').trim() === 'Copy'); \
            if (!copy) return null; \
            let el = copy.previousElementSibling; \
            while (el && el.tagName !== 'P') el = el.previousElementSibling; \
            return el ? el.innerText : null; })()";

        let value = context.page.evaluate(js).await?;
        match value.as_str().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(FlowError::EmptyResult),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = Pally::new();
        assert_eq!(site.id(), "pally");
        assert_eq!(site.selectors().input, "input[name=\"description\"]");
    }

    #[test]
    fn test_system_prompt_dropped() {
        let site = Pally::new();
        let request = ChatRequest::new("a beach scene").with_system_prompt("be formal");
        assert_eq!(site.composed_prompt(&request), "a beach scene");
    }
}
