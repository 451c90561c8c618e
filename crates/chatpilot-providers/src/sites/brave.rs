//! Brave Search "Ask" answers.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, FlowPolicy, Selectors};

pub struct Brave {
    selectors: Selectors,
}

impl Brave {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new(
                "#tap-input-field",
                "button[aria-label=\"Ask\"]",
                ".llm-output",
            )
            .with_file_input("input[type=\"file\"]"),
        }
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Brave {
    fn id(&self) -> &'static str {
        "brave"
    }

    fn label(&self) -> &'static str {
        "Brave Search"
    }

    fn url(&self) -> String {
        "https://search.brave.com/ask".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // The status label flips to "Finished" when the answer is done
        CompletionGate::TextEquals {
            selector: ".answering-label".to_string(),
            text: "Finished".to_string(),
        }
    }

    fn policy(&self) -> FlowPolicy {
        // Answers come back fast; a stuck label means something broke
        FlowPolicy::default().with_completion_timeout_ms(10_000)
    }
}
