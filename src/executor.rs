//! The production job executor: one browser page per job.

use std::sync::Arc;

use async_trait::async_trait;
use chatpilot_cdp::CdpClient;
use chatpilot_config::Settings;
use chatpilot_flow::{ChatFlow, ChatReply};
use chatpilot_providers::ProviderRegistry;
use chatpilot_queue::{Job, JobExecutor};
use tracing::warn;

use crate::wiring;

/// Drives a claimed job through the provider's flow over CDP.
///
/// Each execution connects to the configured endpoint and opens a fresh
/// page, so one job's page state never leaks into the next; the page is
/// closed whatever the outcome.
pub(crate) struct FlowJobExecutor {
    registry: Arc<ProviderRegistry>,
    settings: Settings,
}

impl FlowJobExecutor {
    pub fn new(registry: Arc<ProviderRegistry>, settings: Settings) -> Self {
        Self { registry, settings }
    }
}

#[async_trait]
impl JobExecutor for FlowJobExecutor {
    async fn execute(&self, job: &Job) -> Result<ChatReply, String> {
        let provider = self
            .registry
            .resolve(&job.provider)
            .map_err(|e| e.to_string())?;

        let client = CdpClient::connect(&self.settings.browser.endpoint)
            .await
            .map_err(|e| e.to_string())?;
        let page = Arc::new(client.new_page(None).await.map_err(|e| e.to_string())?);

        let flow = ChatFlow::new(wiring::flow_policy(provider.as_ref(), &self.settings))
            .with_artifacts(wiring::artifact_sink(&self.settings, provider.id()));
        let result = flow
            .run(provider.as_ref(), page.clone(), job.to_request())
            .await;

        if let Err(e) = client.close_page(&page).await {
            warn!(job = %job.id, error = %e, "Failed to close job page");
        }

        result.map_err(|e| e.to_string())
    }
}
