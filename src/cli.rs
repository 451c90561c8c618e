//! CLI definitions for ChatPilot.

use std::path::PathBuf;

use chatpilot_flow::{ChatRequest, OutputFormat};
use clap::{Args, Parser, Subcommand};

/// ChatPilot CLI.
#[derive(Parser)]
#[command(name = "chatpilot")]
#[command(about = "Drives third-party web chat UIs through a browser and scrapes the replies")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Browser debugging endpoint override
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run one prompt against a provider and print the reply
    Run {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Add a job to the queue and print its id
    Enqueue {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Run the polling worker until Ctrl-C
    Worker,

    /// Show one job's status, or per-status counts without an id
    Status {
        /// Job id as printed by `enqueue`
        job_id: Option<String>,
    },

    /// List the supported providers
    Providers,

    /// Prune old completed and failed jobs
    Cleanup {
        /// Retention window in days (default from configuration)
        #[arg(long)]
        retain_days: Option<u32>,
    },
}

/// The job description shared by `run` and `enqueue`.
#[derive(Args)]
pub(crate) struct JobArgs {
    /// Provider id (see `chatpilot providers`)
    #[arg(short, long)]
    pub provider: String,

    /// User prompt
    #[arg(long)]
    pub prompt: String,

    /// System instructions
    #[arg(long)]
    pub system: Option<String>,

    /// File to attach before submitting
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Ask for a JSON reply instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl JobArgs {
    pub fn output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn to_request(&self) -> ChatRequest {
        let mut request = ChatRequest::new(&self.prompt).with_output(self.output());
        if let Some(system) = &self.system {
            request = request.with_system_prompt(system);
        }
        if let Some(file) = &self.file {
            request = request.with_attachment(file);
        }
        request
    }
}
