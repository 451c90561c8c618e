//! Direct one-shot execution and the provider listing.

use std::sync::Arc;

use chatpilot_cdp::CdpClient;
use chatpilot_config::Settings;
use chatpilot_flow::ChatFlow;
use tracing::{info, warn};

use crate::cli::JobArgs;
use crate::wiring;

/// Run one prompt straight through the flow and print the reply.
pub(crate) async fn run(
    settings: Settings,
    args: JobArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = wiring::build_registry(&settings)?;
    let provider = registry.resolve(&args.provider)?;

    info!(
        provider = provider.id(),
        endpoint = %settings.browser.endpoint,
        "Connecting to browser"
    );
    let client = CdpClient::connect(&settings.browser.endpoint).await?;
    let page = Arc::new(client.new_page(None).await?);

    let flow = ChatFlow::new(wiring::flow_policy(provider.as_ref(), &settings))
        .with_artifacts(wiring::artifact_sink(&settings, provider.id()));
    let result = flow
        .run(provider.as_ref(), page.clone(), args.to_request())
        .await;

    if let Err(e) = client.close_page(&page).await {
        warn!(error = %e, "Failed to close page");
    }

    let reply = result?;
    match reply.json {
        Some(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        None => println!("{}", reply.text),
    }
    Ok(())
}

/// List the registered providers and their entry URLs.
pub(crate) fn providers(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let registry = wiring::build_registry(&settings)?;

    println!("{:<12} {:<20} URL", "PROVIDER", "NAME");
    for id in registry.list_ids() {
        if let Some(provider) = registry.get(&id) {
            println!("{:<12} {:<20} {}", id, provider.label(), provider.url());
        }
    }
    Ok(())
}
