//! Cookie file loading.

use std::path::Path;

use chatpilot_cdp::Cookie;
use chatpilot_flow::FlowError;
use tracing::debug;

/// Load a JSON cookie file: an array of cookie objects with at least `name`
/// and `value`, plus the optional `domain`/`path`/`expires`/... fields.
/// Exports that spell the expiry `expirationDate` are accepted as-is.
pub async fn load_cookie_file(path: &Path) -> Result<Vec<Cookie>, FlowError> {
    let data = tokio::fs::read_to_string(path).await?;
    let cookies: Vec<Cookie> = serde_json::from_str(&data)
        .map_err(|e| FlowError::Json(format!("cookie file {}: {e}", path.display())))?;
    debug!(path = %path.display(), count = cookies.len(), "Loaded cookie file");
    Ok(cookies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_load_cookie_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "sso", "value": "abc123", "domain": ".grok.com",
                  "path": "/", "expirationDate": 1767225600.5,
                  "httpOnly": true, "secure": true, "sameSite": "Lax"}},
                {{"name": "session", "value": "xyz"}}
            ]"#
        )
        .unwrap();

        let cookies = load_cookie_file(file.path()).await.unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "sso");
        assert_eq!(cookies[0].expires, Some(1767225600.5));
        assert_eq!(cookies[0].same_site.as_deref(), Some("Lax"));
        assert!(cookies[1].domain.is_none());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_cookie_file(Path::new("/nonexistent/cookies.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Io(_)));
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_cookie_file(file.path()).await.unwrap_err();
        assert!(matches!(err, FlowError::Json(_)));
    }
}
