//! SQLite-backed job queue for ChatPilot.
//!
//! [`JobStore`] persists chat jobs with their full request and outcome;
//! [`Worker`] polls the store, drives each claimed job through a
//! [`JobExecutor`], and records the result. Failed jobs are re-queued until
//! their attempt budget runs out.

mod config;
mod error;
mod job;
mod store;
mod worker;

pub use config::WorkerConfig;
pub use error::QueueError;
pub use job::{Job, JobStatus, NewJob};
pub use store::JobStore;
pub use worker::{JobExecutor, Worker};
