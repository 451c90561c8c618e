//! xAI Grok.
//!
//! Grok has no anonymous tier; a session cookie file is injected before
//! navigation so the page loads straight into the chat.

use std::path::PathBuf;

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowContext, FlowError, Selectors};

use crate::cookies::load_cookie_file;
use crate::settings::ProviderSettings;

pub struct Grok {
    selectors: Selectors,
    cookie_file: Option<PathBuf>,
}

impl Grok {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            selectors: Selectors::new(
                "textarea[aria-label=\"Ask Grok anything\"]",
                "button[type=\"submit\"]",
                "#last-reply-container .message-bubble",
            ),
            cookie_file: settings.cookie_file,
        }
    }
}

#[async_trait]
impl ChatProvider for Grok {
    fn id(&self) -> &'static str {
        "grok"
    }

    fn label(&self) -> &'static str {
        "Grok"
    }

    fn url(&self) -> String {
        "https://grok.com".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        CompletionGate::SelectorVisible("button[aria-label=\"Enter voice mode\"]".to_string())
    }

    /// Cookies must land before the first request, so this replaces the
    /// plain goto.
    async fn navigate(&self, context: &FlowContext) -> Result<(), FlowError> {
        if let Some(path) = &self.cookie_file {
            let cookies = load_cookie_file(path).await?;
            context.page.set_cookies(&cookies).await?;
        }
        context.page.navigate(&self.url()).await?;
        context.settle().await;
        Ok(())
    }
}
