//! Google AI Studio.
//!
//! The most capable site in the catalog and the fussiest to drive: it has a
//! native system-instructions panel, a copyright acknowledgement on first
//! upload, a Run button that doubles as the busy indicator, and hour-long
//! generations on the pro models. JSON output is read from the rendered
//! `<code>` blocks rather than the prose transcript.

use async_trait::async_trait;
use chatpilot_flow::{
    ChatProvider, ChatRequest, CompletionGate, FlowContext, FlowError, FlowPolicy, OutputFormat,
    Selectors,
};

use crate::google_auth::{login_google, GoogleCredentials};
use crate::settings::ProviderSettings;

const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const RUN_BUTTON: &str = "button[aria-label=\"Run\"]";
const RUN_BUTTON_ENABLED: &str = "button[aria-label=\"Run\"]:not([disabled])";
const SYSTEM_PANEL_BUTTON: &str = "button[aria-label=\"System instructions\"]";
const SYSTEM_PANEL_INPUT: &str = "textarea[aria-label=\"System instructions\"]";
const ASSET_MENU_BUTTON: &str =
    "button[aria-label=\"Insert assets such as images, videos, files, or audio\"]";
const UPLOAD_FILE_BUTTON: &str = "button[aria-label=\"Upload File\"]";
const COPYRIGHT_ACK: &str = "button[aria-label=\"Agree to the copyright acknowledgement\"]";

/// Run button present and not showing Stop: generation is over.
const RUN_IDLE_JS: &str = "(() => { \
    const el = document.querySelector('button[aria-label=\"Run\"]'); \
    return !!el && !(el.innerText || '').includes('Stop'); })()";

pub struct AiStudio {
    selectors: Selectors,
    model: Option<String>,
    google: Option<GoogleCredentials>,
}

impl AiStudio {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            selectors: Selectors::new(
                "div.text-input-wrapper textarea",
                RUN_BUTTON,
                "ms-chat-turn div[data-turn-role=\"Model\"]",
            )
            .with_file_input("input[type=\"file\"]"),
            model: settings.model,
            google: settings.google,
        }
    }

    /// The control that proves an upload was accepted depends on what was
    /// uploaded.
    fn upload_confirm_selector(file: &str) -> &'static str {
        let lower = file.to_lowercase();
        if lower.ends_with(".mp4") || lower.ends_with(".mov") {
            "button[aria-label=\"Remove video\"]"
        } else if lower.ends_with(".pdf") {
            "button[aria-label=\"Remove document\"]"
        } else {
            "button[aria-label=\"Remove image\"]"
        }
    }

    async fn dismiss_overlays(&self, context: &FlowContext) -> Result<(), FlowError> {
        context.page.press_key("Escape").await?;
        context.settle_for(500).await;
        context.page.press_key("Escape").await?;
        context.settle_for(1_000).await;
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for AiStudio {
    fn id(&self) -> &'static str {
        "aistudio"
    }

    fn label(&self) -> &'static str {
        "Google AI Studio"
    }

    fn url(&self) -> String {
        format!(
            "https://aistudio.google.com/prompts/new_chat?model={}",
            self.model.as_deref().unwrap_or(DEFAULT_MODEL)
        )
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::Expression(RUN_IDLE_JS.to_string())
    }

    fn policy(&self) -> FlowPolicy {
        // Pro-model generations are legitimately slow
        FlowPolicy::default().with_completion_timeout_ms(3_600_000)
    }

    /// The system prompt goes into the native panel, so nothing is folded
    /// into the typed prompt.
    fn composed_prompt(&self, request: &ChatRequest) -> String {
        request.prompt.clone()
    }

    async fn authenticate(&self, context: &FlowContext) -> Result<(), FlowError> {
        if let Some(credentials) = &self.google {
            login_google(&context.page, credentials).await?;
        }

        // What's-new popup on fresh sessions
        if context
            .page
            .wait_for_selector("button[aria-label=\"close\"]", Some(4_000))
            .await
            .is_ok()
        {
            let _ = context
                .page
                .click_selector("button[aria-label=\"close\"]")
                .await;
            context.settle().await;
        }
        Ok(())
    }

    /// System instructions land in their own panel before the prompt is
    /// typed.
    async fn fill_prompt(&self, context: &FlowContext, text: &str) -> Result<(), FlowError> {
        if let Some(system) = context.request.system_prompt.as_deref() {
            if !system.trim().is_empty() {
                context.page.click_selector(SYSTEM_PANEL_BUTTON).await?;
                context.settle_for(500).await;
                context.page.fill(SYSTEM_PANEL_INPUT, system).await?;
                self.dismiss_overlays(context).await?;
            }
        }

        let input = &self.selectors.input;
        let timeout = context.policy.submit_prompt.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.fill(input, text).await?;
        Ok(())
    }

    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        context.page.click_selector(ASSET_MENU_BUTTON).await?;
        context.settle_for(1_000).await;
        context.page.click_selector(UPLOAD_FILE_BUTTON).await?;

        let input = "input[type=\"file\"]";
        context.page.wait_for_selector(input, Some(5_000)).await?;
        context.page.set_file_input(input, &[file.clone()]).await?;
        context.settle_for(1_000).await;

        // First upload in a session asks for a copyright acknowledgement
        if context.page.query_selector(COPYRIGHT_ACK).await?.is_some() {
            let _ = context.page.click_selector(COPYRIGHT_ACK).await;
        }

        let confirm = Self::upload_confirm_selector(&file);
        context.page.wait_for_selector(confirm, Some(20_000)).await?;
        self.dismiss_overlays(context).await?;
        Ok(())
    }

    /// Run occasionally swallows the first click while the upload is still
    /// settling; a second click on a still-enabled button is harmless.
    async fn submit_prompt(&self, context: &FlowContext) -> Result<(), FlowError> {
        let text = self.composed_prompt(&context.request);
        self.fill_prompt(context, &text).await?;
        context.settle().await;

        let timeout = context.policy.submit_prompt.timeout_ms as u32;
        context
            .page
            .wait_for_selector(RUN_BUTTON_ENABLED, Some(timeout))
            .await?;
        context.page.click_selector(RUN_BUTTON_ENABLED).await?;
        context.settle_for(2_000).await;
        let _ = context.page.click_selector(RUN_BUTTON_ENABLED).await;
        context.settle().await;
        Ok(())
    }

    async fn extract_result(&self, context: &FlowContext) -> Result<String, FlowError> {
        let rule = self.extract_rule();
        let timeout = context.policy.extract_result.timeout_ms as u32;
        context
            .page
            .wait_for_selector(&rule.selector, Some(timeout))
            .await?;

        if context.request.output == OutputFormat::Json {
            let blocks = context.page.inner_texts("code").await?;
            if let Some(code) = blocks.iter().rev().find(|b| !b.trim().is_empty()) {
                return Ok(code.trim().to_string());
            }
            // No rendered code block; fall through to the transcript text
        }

        let text = context
            .page
            .inner_text(&rule.selector, rule.pick)
            .await?
            .unwrap_or_default();
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
    fn test_url_carries_model() {
        let site = AiStudio::new(ProviderSettings::default());
        assert_eq!(
            site.url(),
            "https://aistudio.google.com/prompts/new_chat?model=gemini-2.5-pro"
        );

        let site = AiStudio::new(ProviderSettings::default().with_model("gemini-2.5-flash"));
        assert!(site.url().ends_with("model=gemini-2.5-flash"));
    }

    #[test]
    fn test_upload_confirm_by_extension() {
        assert_eq!(
            AiStudio::upload_confirm_selector("/tmp/clip.MP4"),
            "button[aria-label=\"Remove video\"]"
        );
        assert_eq!(
            AiStudio::upload_confirm_selector("/tmp/report.pdf"),
            "button[aria-label=\"Remove document\"]"
        );
        assert_eq!(
            AiStudio::upload_confirm_selector("/tmp/photo.jpeg"),
            "button[aria-label=\"Remove image\"]"
        );
        // Unknown extensions are treated as images
        assert_eq!(
            AiStudio::upload_confirm_selector("/tmp/blob.bin"),
            "button[aria-label=\"Remove image\"]"
        );
    }

    #[test]
    fn test_system_prompt_not_folded_into_text() {
        let site = AiStudio::new(ProviderSettings::default());
        let request = ChatRequest::new("describe the image").with_system_prompt("reply in JSON");
        assert_eq!(site.composed_prompt(&request), "describe the image");
    }

    #[test]
    fn test_completion_watches_run_button() {
        let site = AiStudio::new(ProviderSettings::default());
        let js = site.completion_gate().js_condition().unwrap();
        assert!(js.contains("aria-label=\"Run\""));
        assert!(js.contains("Stop"));
        assert_eq!(site.policy().await_completion.timeout_ms, 3_600_000);
    }
}
