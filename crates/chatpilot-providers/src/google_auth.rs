//! Scripted Google sign-in, shared by the sites that sit behind a Google
//! account.

use chatpilot_cdp::{PageSession, Pick};
use chatpilot_flow::FlowError;
use tracing::{debug, info};

/// How long a pending 2-Step Verification prompt is waited out.
const TWO_STEP_WAIT_MS: u32 = 120_000;

#[derive(Debug, Clone)]
pub struct GoogleCredentials {
    pub email: String,
    pub password: String,
}

impl GoogleCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Drive the Google sign-in form when it is on screen.
///
/// No-op when the identifier field is absent (already signed in, or the site
/// skipped its login wall). Accounts with 2-Step Verification block here,
/// bounded, until the prompt is approved on the trusted device.
pub async fn login_google(
    page: &PageSession,
    credentials: &GoogleCredentials,
) -> Result<(), FlowError> {
    if page.query_selector("#identifierId").await?.is_none() {
        debug!("No Google sign-in form on screen, skipping login");
        return Ok(());
    }

    info!(email = %credentials.email, "Filling Google sign-in form");
    page.fill("#identifierId", &credentials.email).await?;
    page.click_selector("#identifierNext").await?;

    page.wait_for_selector("input[type=\"password\"]", Some(10_000))
        .await?;
    tokio::time::sleep(std::time::Duration::from_millis(1_000)).await;
    page.fill("input[type=\"password\"]", &credentials.password)
        .await?;
    page.click_selector("#passwordNext").await?;
    tokio::time::sleep(std::time::Duration::from_millis(3_000)).await;

    if let Some(heading) = page.inner_text("#headingText", Pick::First).await? {
        if heading.contains("2-Step Verification") {
            info!("2-Step Verification pending, waiting for approval on the trusted device");
            page.wait_for_selector_gone("#headingText", Some(TWO_STEP_WAIT_MS))
                .await?;
        }
    }

    Ok(())
}
