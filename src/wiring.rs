//! Builds the provider catalog and per-run flow pieces from configuration.

use std::collections::HashMap;

use chatpilot_config::Settings;
use chatpilot_flow::{ArtifactSink, ChatProvider, FlowPolicy};
use chatpilot_providers::{
    builtin_registry, GoogleCredentials, ProviderRegistry, ProviderSettings, RegistryError,
};

/// Google-backed sites that pick up `[google]` credentials automatically.
const GOOGLE_SITES: [&str; 2] = ["aistudio", "gemini"];

/// The full provider catalog, wired with per-provider settings.
pub(crate) fn build_registry(settings: &Settings) -> Result<ProviderRegistry, RegistryError> {
    let mut per_site: HashMap<String, ProviderSettings> = HashMap::new();

    for (id, entry) in &settings.providers {
        let mut site = ProviderSettings::default();
        if let Some(path) = entry.cookie_file_path() {
            site = site.with_cookie_file(path);
        }
        if let Some(model) = &entry.model {
            site = site.with_model(model);
        }
        per_site.insert(id.clone(), site);
    }

    if let (Some(email), Some(password)) = (&settings.google.email, &settings.google.password) {
        let credentials = GoogleCredentials::new(email, password);
        for id in GOOGLE_SITES {
            per_site
                .entry(id.to_string())
                .or_default()
                .google = Some(credentials.clone());
        }
    }

    builtin_registry(&per_site)
}

/// The provider's own policy with the `[flow]` overrides applied on top.
pub(crate) fn flow_policy(provider: &dyn ChatProvider, settings: &Settings) -> FlowPolicy {
    let mut policy = provider.policy();
    let flow = &settings.flow;

    if let Some(ms) = flow.settle_ms {
        policy.settle_ms = ms;
    }
    if let Some(ms) = flow.navigate_timeout_ms {
        policy.navigate.timeout_ms = ms;
    }
    if let Some(ms) = flow.upload_timeout_ms {
        policy.attach_file.timeout_ms = ms;
    }
    if let Some(ms) = flow.completion_timeout_ms {
        policy.await_completion.timeout_ms = ms;
    }
    policy
}

/// Screenshot sink for one provider run, honoring the capture switch.
pub(crate) fn artifact_sink(settings: &Settings, provider_id: &str) -> ArtifactSink {
    if settings.artifacts.capture {
        ArtifactSink::new(settings.artifacts_dir(), provider_id)
    } else {
        ArtifactSink::disabled()
    }
}
