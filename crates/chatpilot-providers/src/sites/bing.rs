//! Bing image search, which renders an inline AI answer.

use async_trait::async_trait;
use chatpilot_flow::{ChatProvider, CompletionGate, Selectors};

pub struct Bing {
    selectors: Selectors,
}

impl Bing {
    pub fn new() -> Self {
        Self {
            selectors: Selectors::new("#sb_form_q", "#sb_form_go", ".semi-ew-wrapper"),
        }
    }
}

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for Bing {
    fn id(&self) -> &'static str {
        "bing"
    }

    fn label(&self) -> &'static str {
        "Bing"
    }

    fn url(&self) -> String {
        "https://www.bing.com/images".to_string()
    }

    fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    fn completion_gate(&self) -> CompletionGate {
        // The answer wrapper offers no done signal; give it a quiet period
        CompletionGate::Settled { ms: 10_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let site = Bing::new();
        assert_eq!(site.id(), "bing");
        assert!(site.url().starts_with("https://www.bing.com"));
        assert!(site.selectors().file_input.is_none());
        assert!(matches!(site.completion_gate(), CompletionGate::Settled { .. }));
    }
}
