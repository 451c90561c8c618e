//! Provider registry: id → provider lookup for the whole catalog.

use std::collections::HashMap;
use std::sync::Arc;

use chatpilot_flow::ChatProvider;
use dashmap::DashMap;
use thiserror::Error;

use crate::settings::ProviderSettings;
use crate::sites;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Provider already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Unknown provider: {0}")]
    Unknown(String),
}

/// Registry of chat providers, keyed by their stable ids.
pub struct ProviderRegistry {
    providers: DashMap<String, Arc<dyn ChatProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Register a provider. Ids are unique; a second registration under the
    /// same id is rejected.
    pub fn register(&self, provider: Arc<dyn ChatProvider>) -> Result<(), RegistryError> {
        let id = provider.id().to_string();

        if self.providers.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        self.providers.insert(id, provider);
        Ok(())
    }

    /// Unregister a provider.
    pub fn unregister(&self, id: &str) -> Result<(), RegistryError> {
        self.providers
            .remove(id)
            .ok_or_else(|| RegistryError::Unknown(id.to_string()))?;
        Ok(())
    }

    /// Get a provider by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn ChatProvider>> {
        self.providers.get(id).map(|p| p.clone())
    }

    /// Get a provider by id, erroring on unknown ids.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn ChatProvider>, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::Unknown(id.to_string()))
    }

    /// All registered ids, sorted.
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.iter().map(|p| p.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full catalog, wiring each site with its settings (if any).
pub fn builtin_registry(
    settings: &HashMap<String, ProviderSettings>,
) -> Result<ProviderRegistry, RegistryError> {
    let registry = ProviderRegistry::new();
    let for_site = |id: &str| settings.get(id).cloned().unwrap_or_default();

    registry.register(Arc::new(sites::AiMode::new()))?;
    registry.register(Arc::new(sites::AiStudio::new(for_site("aistudio"))))?;
    registry.register(Arc::new(sites::Bing::new()))?;
    registry.register(Arc::new(sites::Brave::new()))?;
    registry.register(Arc::new(sites::Copilot::new()))?;
    registry.register(Arc::new(sites::DuckDuckGo::new()))?;
    registry.register(Arc::new(sites::Gemini::new(for_site("gemini"))))?;
    registry.register(Arc::new(sites::Grok::new(for_site("grok"))))?;
    registry.register(Arc::new(sites::Meta::new()))?;
    registry.register(Arc::new(sites::Mistral::new()))?;
    registry.register(Arc::new(sites::MoonDream::new()))?;
    registry.register(Arc::new(sites::Pally::new()))?;
    registry.register(Arc::new(sites::Perplexity::new()))?;
    registry.register(Arc::new(sites::Qwen::new(for_site("qwen"))))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatpilot_flow::{CompletionGate, Selectors};

    struct MockSite {
        id: &'static str,
        selectors: Selectors,
    }

    impl MockSite {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                selectors: Selectors::new("textarea", "button", ".reply"),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for MockSite {
        fn id(&self) -> &'static str {
            self.id
        }

        fn url(&self) -> String {
            "https://example.com".to_string()
        }

        fn selectors(&self) -> &Selectors {
            &self.selectors
        }

        fn completion_gate(&self) -> CompletionGate {
            CompletionGate::Settled { ms: 1000 }
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ProviderRegistry::new();
        assert!(registry.list_ids().is_empty());
    }

    #[test]
    fn test_register_and_get() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockSite::new("mock"))).unwrap();

        let provider = registry.get("mock");
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().id(), "mock");
    }

    #[test]
    fn test_register_duplicate() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockSite::new("mock"))).unwrap();

        let result = registry.register(Arc::new(MockSite::new("mock")));
        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(_))));
    }

    #[test]
    fn test_unregister() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockSite::new("mock"))).unwrap();
        registry.unregister("mock").unwrap();
        assert!(registry.list_ids().is_empty());
    }

    #[test]
    fn test_unregister_nonexistent() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.unregister("ghost"),
            Err(RegistryError::Unknown(_))
        ));
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ProviderRegistry::new();
        let err = registry.resolve("ghost").err().unwrap();
        assert_eq!(err.to_string(), "Unknown provider: ghost");
    }

    #[test]
    fn test_list_ids_sorted() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(MockSite::new("zeta"))).unwrap();
        registry.register(Arc::new(MockSite::new("alpha"))).unwrap();
        assert_eq!(registry.list_ids(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_builtin_registry_catalog() {
        let registry = builtin_registry(&HashMap::new()).unwrap();
        let ids = registry.list_ids();
        assert_eq!(
            ids,
            vec![
                "aimode",
                "aistudio",
                "bing",
                "brave",
                "copilot",
                "duckduckgo",
                "gemini",
                "grok",
                "meta",
                "mistral",
                "moondream",
                "pally",
                "perplexity",
                "qwen",
            ]
        );
    }

    #[test]
    fn test_builtin_registry_labels() {
        let registry = builtin_registry(&HashMap::new()).unwrap();
        assert_eq!(registry.get("aistudio").unwrap().label(), "Google AI Studio");
        assert_eq!(registry.get("duckduckgo").unwrap().label(), "DuckDuckGo AI Chat");
        assert_eq!(registry.get("grok").unwrap().label(), "Grok");
    }

    #[test]
    fn test_builtin_registry_applies_settings() {
        let mut settings = HashMap::new();
        settings.insert(
            "gemini".to_string(),
            ProviderSettings::default().with_model("2.5 Flash"),
        );
        let registry = builtin_registry(&settings).unwrap();
        // The configured model shows up in the provider's behavior; the
        // registry itself just routes the settings through.
        assert!(registry.get("gemini").is_some());
    }
}
