//! Job definition and status.

use chatpilot_flow::{ChatRequest, OutputFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Lifecycle of a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting in queue.
    Pending,
    /// Claimed by a worker.
    Running,
    /// Finished with a reply.
    Completed,
    /// Attempt budget exhausted.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "running" => Some(JobStatus::Running),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job waiting to be enqueued.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub provider: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub attachment: Option<PathBuf>,
    pub output: OutputFormat,
    pub max_attempts: u32,
}

impl NewJob {
    pub fn new(provider: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            prompt: prompt.into(),
            system_prompt: None,
            attachment: None,
            output: OutputFormat::Text,
            max_attempts: 3,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// A persisted job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub provider: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub attachment: Option<PathBuf>,
    pub output: OutputFormat,
    pub status: JobStatus,
    /// Reply serialized as JSON, set on completion.
    pub result: Option<String>,
    /// Last failure message.
    pub error: Option<String>,
    pub attempts: u32,
    pub max_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub(crate) fn from_new(new: NewJob) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider: new.provider,
            prompt: new.prompt,
            system_prompt: new.system_prompt,
            attachment: new.attachment,
            output: new.output,
            status: JobStatus::Pending,
            result: None,
            error: None,
            attempts: 0,
            max_attempts: new.max_attempts,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Whether a failure at this point re-queues the job.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }

    /// The flow request this job describes.
    pub fn to_request(&self) -> ChatRequest {
        let mut request = ChatRequest::new(&self.prompt).with_output(self.output);
        if let Some(system) = &self.system_prompt {
            request = request.with_system_prompt(system);
        }
        if let Some(path) = &self.attachment {
            request = request.with_attachment(path);
        }
        request
    }
}
