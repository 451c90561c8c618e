//! The provider-agnostic chat workflow engine.
//!
//! Every supported chat UI is driven through the same six-step life-cycle:
//! navigate → authenticate → attach_file → submit_prompt → await_completion
//! → extract_result. [`ChatProvider`] carries default bodies for each step,
//! driven by a per-provider [`Selectors`] table and [`CompletionGate`];
//! providers override only the steps where their page misbehaves.
//!
//! [`ChatFlow`] executes the steps in order under a per-step
//! timeout/retry [`FlowPolicy`], captures screenshot artifacts along the
//! way, and post-processes the scraped reply into text or JSON.

mod artifacts;
mod error;
mod gate;
mod policy;
mod postprocess;
mod prompt;
mod provider;
mod request;
mod runner;
mod selectors;

pub use artifacts::ArtifactSink;
pub use error::FlowError;
pub use gate::CompletionGate;
pub use policy::{FlowPolicy, FlowStep, StepPolicy};
pub use postprocess::{json_from_reply, last_code_block, lenient_json, truncate_at_disclaimer};
pub use prompt::compose_prompt;
pub use provider::{ChatProvider, FlowContext};
pub use request::{ChatReply, ChatRequest, OutputFormat};
pub use runner::ChatFlow;
pub use selectors::{ExtractRule, Selectors};

// Re-exported so provider implementations depend on one crate for the
// common vocabulary.
pub use chatpilot_cdp::{CdpError, PageSession, Pick};
