//! Step-by-step flow execution.

use std::sync::Arc;

use chatpilot_cdp::PageSession;
use tracing::{debug, error, info, warn};

use crate::artifacts::ArtifactSink;
use crate::error::FlowError;
use crate::policy::{FlowPolicy, FlowStep};
use crate::provider::{ChatProvider, FlowContext};
use crate::request::{ChatReply, ChatRequest};

/// Grace added on top of a step's own budget, so inner waits report their
/// more specific timeout before the outer guard fires.
const STEP_GRACE_MS: u64 = 1_000;

/// Runs a [`ChatProvider`] through the step sequence under a [`FlowPolicy`].
///
/// Each step gets its policy's timeout and attempt budget; a step that
/// exhausts its attempts aborts the flow with [`FlowError::StepFailed`].
/// Screenshots are captured after the steps that change what is on screen,
/// and on the final failure of any step.
pub struct ChatFlow {
    policy: FlowPolicy,
    artifacts: ArtifactSink,
}

impl ChatFlow {
    pub fn new(policy: FlowPolicy) -> Self {
        Self {
            policy,
            artifacts: ArtifactSink::disabled(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: ArtifactSink) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Drive `provider` through the full flow and return the processed reply.
    pub async fn run(
        &self,
        provider: &dyn ChatProvider,
        page: Arc<PageSession>,
        request: ChatRequest,
    ) -> Result<ChatReply, FlowError> {
        let context = FlowContext::new(
            page,
            request,
            self.policy.clone(),
            self.artifacts.clone(),
        );

        info!(
            provider = provider.id(),
            output = %context.request.output,
            attachment = context.request.attachment.is_some(),
            "Starting chat flow"
        );

        let mut raw: Option<String> = None;

        for step in FlowStep::ALL {
            if step == FlowStep::AttachFile && context.request.attachment.is_none() {
                debug!(provider = provider.id(), "No attachment, skipping attach_file");
                continue;
            }

            if let Some(value) = self.run_step(provider, &context, step).await? {
                raw = Some(value);
            }

            if matches!(
                step,
                FlowStep::Navigate | FlowStep::SubmitPrompt | FlowStep::AwaitCompletion
            ) {
                context.artifacts.capture(&context.page, step.as_str()).await;
            }
        }

        let raw = raw.ok_or(FlowError::EmptyResult)?;
        let reply = provider.post_process(&context.request, &raw)?;
        info!(
            provider = provider.id(),
            chars = reply.text.len(),
            "Chat flow completed"
        );
        Ok(reply)
    }

    /// One step under its timeout/retry budget.
    async fn run_step(
        &self,
        provider: &dyn ChatProvider,
        context: &FlowContext,
        step: FlowStep,
    ) -> Result<Option<String>, FlowError> {
        let step_policy = self.policy.step(step);
        let attempts = step_policy.attempts.max(1);
        let budget = std::time::Duration::from_millis(step_policy.timeout_ms + STEP_GRACE_MS);

        let mut last_err = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                debug!(step = %step, attempt, "Retrying step");
                tokio::time::sleep(std::time::Duration::from_millis(step_policy.backoff_ms)).await;
            }

            match tokio::time::timeout(budget, Self::execute(provider, context, step)).await {
                Ok(Ok(value)) => {
                    debug!(provider = provider.id(), step = %step, "Step completed");
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    warn!(
                        provider = provider.id(),
                        step = %step,
                        attempt,
                        error = %e,
                        "Step attempt failed"
                    );
                    last_err = Some(e);
                }
                Err(_) => {
                    warn!(
                        provider = provider.id(),
                        step = %step,
                        attempt,
                        timeout_ms = step_policy.timeout_ms,
                        "Step attempt timed out"
                    );
                    last_err = Some(FlowError::StepTimeout {
                        step,
                        timeout_ms: step_policy.timeout_ms,
                    });
                }
            }
        }

        context
            .artifacts
            .capture(&context.page, &format!("{step}-failed"))
            .await;
        error!(provider = provider.id(), step = %step, "Step failed, aborting flow");

        match last_err {
            Some(source) => Err(FlowError::StepFailed {
                step,
                attempts,
                source: Box::new(source),
            }),
            // attempts >= 1, so at least one arm above ran
            None => Err(FlowError::StepTimeout {
                step,
                timeout_ms: step_policy.timeout_ms,
            }),
        }
    }

    async fn execute(
        provider: &dyn ChatProvider,
        context: &FlowContext,
        step: FlowStep,
    ) -> Result<Option<String>, FlowError> {
        match step {
            FlowStep::Navigate => provider.navigate(context).await.map(|_| None),
            FlowStep::Authenticate => provider.authenticate(context).await.map(|_| None),
            FlowStep::AttachFile => provider.attach_file(context).await.map(|_| None),
            FlowStep::SubmitPrompt => provider.submit_prompt(context).await.map(|_| None),
            FlowStep::AwaitCompletion => provider.await_completion(context).await.map(|_| None),
            FlowStep::ExtractResult => provider.extract_result(context).await.map(Some),
        }
    }
}
