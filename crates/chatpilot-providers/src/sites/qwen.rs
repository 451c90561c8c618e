//! Qwen chat.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

use crate::actions;
use crate::google_auth::{login_google, GoogleCredentials};
use crate::settings::ProviderSettings;

pub struct Qwen {
    selectors: Selectors,
    google: Option<GoogleCredentials>,
}

impl Qwen {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            selectors: Selectors::new(
                "textarea#chat-input",
                "button[type=\"submit\"]",
                "#response-message-body",
            ),
            google: settings.google,
        }
    }
}

#[async_trait]
impl ChatProvider for Qwen {
    fn id(&self) -> &'static str {
        "qwen"
    }

    fn label(&self) -> &'static str {
        "Qwen Chat"
    }

    fn url(&self) -> String {
        "https://chat.qwen.ai".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::SelectorVisible("#send-message-button".to_string())
    }

    /// Best-effort sign-in through "Continue with Google". An already
    /// signed-in session has no Log in button, which is fine.
    async fn authenticate(&self, context: &FlowContext) -> Result<(), FlowError> {
        if actions::click_text(&context.page, "button", "Log in")
            .await
            .is_err()
        {
            return Ok(());
        }
        context.settle_for(2_000).await;

        if actions::click_text(&context.page, "button", "Continue with Google")
            .await
            .is_err()
        {
            return Ok(());
        }
        context.settle_for(3_000).await;

        if let Some(credentials) = &self.google {
            login_google(&context.page, credentials).await?;
            context.settle().await;
        }
        Ok(())
    }
}
