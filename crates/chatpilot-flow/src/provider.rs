//! The provider strategy trait.
//!
//! [`ChatProvider`] gives every step of the chat life-cycle a default body
//! driven by the provider's [`Selectors`] table and [`CompletionGate`]. A
//! well-behaved page needs nothing beyond those accessors; providers override
//! individual steps only where their page deviates (consent popups, upload
//! dialogs, native system-prompt panels).

use std::sync::Arc;

use async_trait::async_trait;
use chatpilot_cdp::PageSession;

use crate::artifacts::ArtifactSink;
use crate::error::FlowError;
use crate::gate::CompletionGate;
use crate::policy::FlowPolicy;
use crate::postprocess::json_from_reply;
use crate::prompt::compose_prompt;
use crate::request::{ChatReply, ChatRequest, OutputFormat};
use crate::selectors::{ExtractRule, Selectors};

/// Everything a step body needs: the page, the request being run, the
/// timing policy, and the artifact sink.
pub struct FlowContext {
    pub page: Arc<PageSession>,
    pub request: ChatRequest,
    pub policy: FlowPolicy,
    pub artifacts: ArtifactSink,
}

impl FlowContext {
    pub fn new(
        page: Arc<PageSession>,
        request: ChatRequest,
        policy: FlowPolicy,
        artifacts: ArtifactSink,
    ) -> Self {
        Self {
            page,
            request,
            policy,
            artifacts,
        }
    }

    /// Give the page the policy's settle delay to catch up with itself.
    pub async fn settle(&self) {
        self.settle_for(self.policy.settle_ms).await;
    }

    pub async fn settle_for(&self, ms: u64) {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }

    /// The request's attachment as a path string, verified to exist on disk.
    pub fn attachment_path(&self) -> Result<Option<String>, FlowError> {
        match self.request.attachment.as_ref() {
            None => Ok(None),
            Some(path) if path.exists() => Ok(Some(path.to_string_lossy().into_owned())),
            Some(path) => Err(FlowError::AttachmentNotFound(path.clone())),
        }
    }
}

/// One supported chat UI, driven through the shared step sequence.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short stable identifier, e.g. `"grok"`. Used for job records,
    /// registry lookups, and artifact names.
    fn id(&self) -> &'static str;

    /// Human-readable name for listings. Defaults to the id.
    fn label(&self) -> &'static str {
        self.id()
    }

    /// Page the flow starts from.
    fn url(&self) -> String;

    /// Element table the default step bodies act on.
    fn selectors(&self) -> &Selectors;

    /// Signal that the reply has finished rendering.
    fn completion_gate(&self) -> CompletionGate;

    /// Timing tuned for this provider's page. Callers may still override
    /// individual budgets before handing the policy to the runner.
    fn policy(&self) -> FlowPolicy {
        FlowPolicy::default()
    }

    /// Where the reply is read from. Transcripts stack messages under the
    /// result selector, so the last match is the default.
    fn extract_rule(&self) -> ExtractRule {
        ExtractRule::last(self.selectors().result.clone())
    }

    /// Text actually typed into the page. Providers with a native system
    /// prompt surface override this to submit the user prompt alone.
    fn composed_prompt(&self, request: &ChatRequest) -> String {
        compose_prompt(request.system_prompt.as_deref(), &request.prompt)
    }

    /// Open the provider page.
    async fn navigate(&self, context: &FlowContext) -> Result<(), FlowError> {
        context.page.navigate(&self.url()).await?;
        context.settle().await;
        Ok(())
    }

    /// Log in or dismiss whatever stands between the page and the prompt
    /// box. Default: nothing to do.
    async fn authenticate(&self, _context: &FlowContext) -> Result<(), FlowError> {
        Ok(())
    }

    /// Attach the request's file through the provider's file input.
    async fn attach_file(&self, context: &FlowContext) -> Result<(), FlowError> {
        let Some(file) = context.attachment_path()? else {
            return Ok(());
        };
        let input = self
            .selectors()
            .file_input
            .as_deref()
            .ok_or(FlowError::NoFileInput)?;

        let timeout = context.policy.attach_file.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.set_file_input(input, &[file]).await?;
        context.settle().await;
        Ok(())
    }

    /// Type `text` into the prompt box.
    async fn fill_prompt(&self, context: &FlowContext, text: &str) -> Result<(), FlowError> {
        let input = &self.selectors().input;
        let timeout = context.policy.submit_prompt.timeout_ms as u32;
        context.page.wait_for_selector(input, Some(timeout)).await?;
        context.page.fill(input, text).await?;
        Ok(())
    }

    /// Compose, fill, and send the prompt.
    async fn submit_prompt(&self, context: &FlowContext) -> Result<(), FlowError> {
        let text = self.composed_prompt(&context.request);
        self.fill_prompt(context, &text).await?;
        context.settle().await;
        context
            .page
            .click_selector(&self.selectors().send_button)
            .await?;
        context.settle().await;
        Ok(())
    }

    /// Block until the completion gate opens.
    async fn await_completion(&self, context: &FlowContext) -> Result<(), FlowError> {
        self.completion_gate()
            .wait(&context.page, context.policy.await_completion.timeout_ms)
            .await?;
        context.settle().await;
        Ok(())
    }

    /// Scrape the reply text off the page.
    async fn extract_result(&self, context: &FlowContext) -> Result<String, FlowError> {
        let rule = self.extract_rule();
        let timeout = context.policy.extract_result.timeout_ms as u32;
        context
            .page
            .wait_for_selector(&rule.selector, Some(timeout))
            .await?;

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

    /// Shape the scraped text into the requested reply.
    fn post_process(&self, request: &ChatRequest, raw: &str) -> Result<ChatReply, FlowError> {
        let text = raw.trim().to_string();
        match request.output {
            OutputFormat::Text => Ok(ChatReply::text(text)),
            OutputFormat::Json => {
                let json = json_from_reply(&text)?;
                Ok(ChatReply::json(text, json))
            }
        }
    }
}
