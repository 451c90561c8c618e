//! Google Gemini.
//!
//! The heavier of the Google properties: a Quill prompt editor, a model
//! picker behind a menu button, and a two-level upload menu. Model names in
//! the picker are display labels ("2.5 Pro"), not API ids.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, FlowPolicy, Selectors};
use tracing::warn;

use crate::actions;
use crate::google_auth::{login_google, GoogleCredentials};
use crate::settings::ProviderSettings;

const DEFAULT_MODEL: &str = "2.5 Pro";
const FALLBACK_MODEL: &str = "2.5 Flash";
const MODEL_MENU_BUTTON: &str = "div[data-test-id=\"bard-mode-menu-button\"] button";
const MODEL_MENU_PANEL: &str = "#mat-menu-panel-0";

pub struct Gemini {
    selectors: Selectors,
    model: Option<String>,
    google: Option<GoogleCredentials>,
}

impl Gemini {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            selectors: Selectors::new(
                "rich-textarea div.ql-editor[contenteditable=\"true\"]",
                "button[aria-label=\"Send message\"]",
                "message-content",
            )
            .with_file_input("input[type=\"file\"]"),
            model: settings.model,
            google: settings.google,
        }
    }

    /// Pick the requested model from the mode menu, falling back to the
    /// cheaper tier when the label is not offered to this account.
    async fn select_model(&self, context: &FlowContext) -> Result<(), FlowError> {
        let wanted = self.model.as_deref().unwrap_or(DEFAULT_MODEL);

        // Any open overlay swallows the menu click
        context.page.press_key("Escape").await?;
        context.settle_for(500).await;
        context.page.press_key("Escape").await?;
        context.settle_for(1_000).await;

        context.page.click_selector(MODEL_MENU_BUTTON).await?;
        context
            .page
            .wait_for_selector(MODEL_MENU_PANEL, Some(5_000))
            .await?;

        let panel_buttons = format!("{MODEL_MENU_PANEL} button");
        if actions::click_text(&context.page, &panel_buttons, wanted)
            .await
            .is_err()
        {
            warn!(model = wanted, fallback = FALLBACK_MODEL, "Model not in menu");
            actions::click_text(&context.page, &panel_buttons, FALLBACK_MODEL).await?;
        }
        context.settle().await;
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for Gemini {
    fn id(&self) -> &'static str {
        "gemini"
    }

    fn label(&self) -> &'static str {
        "Google Gemini"
    }

    fn url(&self) -> String {
        "https://gemini.google.com".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::SelectorHidden("button[aria-label=\"Stop response\"]".to_string())
    }

    fn policy(&self) -> FlowPolicy {
        FlowPolicy::default().with_completion_timeout_ms(20_000)
    }

    async fn authenticate(&self, context: &FlowContext) -> Result<(), FlowError> {
        if let Some(credentials) = &self.google {
            login_google(&context.page, credentials).await?;
        }
        self.select_model(context).await
    }

    /// Uploads go through the two-level menu before the file input exists.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };

        context
            .page
            .click_selector("button[aria-label=\"Open upload file menu\"]")
            .await?;
        context.settle_for(1_000).await;
        context
            .page
            .click_selector("[data-test-id=\"local-image-file-uploader-button\"]")
            .await?;

        let input = "input[type=\"file\"]";
        context.page.wait_for_selector(input, Some(5_000)).await?;
        context.page.set_file_input(input, &[file]).await?;
        context.settle().await;
        Ok(())
    }
}
