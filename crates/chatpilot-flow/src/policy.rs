//! Per-step timeout and retry policy.

use std::fmt;

/// The fixed steps of every chat workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    Navigate,
    Authenticate,
    AttachFile,
    SubmitPrompt,
    AwaitCompletion,
    ExtractResult,
}

impl FlowStep {
    /// All steps in execution order.
    pub const ALL: [FlowStep; 6] = [
        FlowStep::Navigate,
        FlowStep::Authenticate,
        FlowStep::AttachFile,
        FlowStep::SubmitPrompt,
        FlowStep::AwaitCompletion,
        FlowStep::ExtractResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::Navigate => "navigate",
            FlowStep::Authenticate => "authenticate",
            FlowStep::AttachFile => "attach_file",
            FlowStep::SubmitPrompt => "submit_prompt",
            FlowStep::AwaitCompletion => "await_completion",
            FlowStep::ExtractResult => "extract_result",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budget for one step: how long it may run and how often it is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPolicy {
    /// Hard deadline per attempt.
    pub timeout_ms: u64,
    /// Total attempts (1 = no retry).
    pub attempts: u32,
    /// Sleep between attempts.
    pub backoff_ms: u64,
}

impl StepPolicy {
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            attempts: 1,
            backoff_ms: 1000,
        }
    }

    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub const fn with_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }
}

/// The full per-provider policy: one [`StepPolicy`] per step plus the settle
/// pause inserted after page-changing actions.
///
/// Defaults reflect how these chat UIs actually behave: navigation and
/// submission are quick, uploads take a while to register, and reply
/// generation can run for minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPolicy {
    pub navigate: StepPolicy,
    pub authenticate: StepPolicy,
    pub attach_file: StepPolicy,
    pub submit_prompt: StepPolicy,
    pub await_completion: StepPolicy,
    pub extract_result: StepPolicy,
    /// Quiet period after navigation, fill, submit, and completion.
    pub settle_ms: u64,
}

impl Default for FlowPolicy {
    fn default() -> Self {
        Self {
            navigate: StepPolicy::new(30_000),
            authenticate: StepPolicy::new(30_000),
            attach_file: StepPolicy::new(20_000),
            submit_prompt: StepPolicy::new(30_000).with_attempts(2),
            await_completion: StepPolicy::new(900_000),
            extract_result: StepPolicy::new(15_000).with_attempts(2),
            settle_ms: 2_000,
        }
    }
}

impl FlowPolicy {
    /// Policy for the given step.
    pub fn step(&self, step: FlowStep) -> StepPolicy {
        match step {
            FlowStep::Navigate => self.navigate,
            FlowStep::Authenticate => self.authenticate,
            FlowStep::AttachFile => self.attach_file,
            FlowStep::SubmitPrompt => self.submit_prompt,
            FlowStep::AwaitCompletion => self.await_completion,
            FlowStep::ExtractResult => self.extract_result,
        }
    }

    pub fn with_completion_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.await_completion.timeout_ms = timeout_ms;
        self
    }

    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(FlowStep::ALL[0], FlowStep::Navigate);
        assert_eq!(FlowStep::ALL[5], FlowStep::ExtractResult);
        assert_eq!(FlowStep::ALL.len(), 6);
    }

    #[test]
    fn test_step_display() {
        assert_eq!(FlowStep::SubmitPrompt.to_string(), "submit_prompt");
        assert_eq!(FlowStep::AwaitCompletion.as_str(), "await_completion");
    }

    #[test]
    fn test_step_policy_builder() {
        let p = StepPolicy::new(5_000).with_attempts(3).with_backoff_ms(250);
        assert_eq!(p.timeout_ms, 5_000);
        assert_eq!(p.attempts, 3);
        assert_eq!(p.backoff_ms, 250);
    }

    #[test]
    fn test_flow_policy_defaults() {
        let policy = FlowPolicy::default();
        assert_eq!(policy.settle_ms, 2_000);
        assert_eq!(policy.attach_file.timeout_ms, 20_000);
        assert_eq!(policy.await_completion.timeout_ms, 900_000);
        // Submission is retried: the first click can land mid-layout
        assert_eq!(policy.submit_prompt.attempts, 2);
    }

    #[test]
    fn test_flow_policy_step_lookup() {
        let policy = FlowPolicy::default().with_completion_timeout_ms(3_600_000);
        assert_eq!(policy.step(FlowStep::AwaitCompletion).timeout_ms, 3_600_000);
        assert_eq!(policy.step(FlowStep::Navigate).timeout_ms, 30_000);
    }
}
