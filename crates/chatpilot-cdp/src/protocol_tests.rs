use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://gemini.google.com"})),
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Page.navigate"));
    assert!(json.contains("gemini.google.com"));
    // Absent fields stay off the wire
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_request_session_id_rename() {
    let req = CdpRequest {
        id: 7,
        method: "DOM.getDocument".to_string(),
        params: None,
        session_id: Some("SESSION1".to_string()),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("\"sessionId\":\"SESSION1\""));
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert!(resp.result.is_some());
    assert!(resp.error.is_none());
}

#[test]
fn test_cdp_response_event_deserialize() {
    let json = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 1.0}, "sessionId": "S"}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, None);
    assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
    assert_eq!(resp.session_id.as_deref(), Some("S"));
}

#[test]
fn test_page_info_deserialize() {
    let json = r#"{
        "id": "page123",
        "type": "page",
        "title": "Gemini",
        "url": "https://gemini.google.com/",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
    }"#;
    let info: PageInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.id, "page123");
    assert_eq!(info.page_type, "page");
}

#[test]
fn test_mouse_button_serialize() {
    let btn = MouseButton::Left;
    let json = serde_json::to_string(&btn).unwrap();
    assert_eq!(json, "\"left\"");
}

#[test]
fn test_screenshot_format_serialize() {
    let fmt = ScreenshotFormat::Png;
    let json = serde_json::to_string(&fmt).unwrap();
    assert_eq!(json, "\"png\"");
}

#[test]
fn test_cookie_roundtrip() {
    // The shape cookie-export extensions produce
    let json = r#"{
        "name": "sso-rw",
        "value": "token",
        "domain": ".grok.com",
        "path": "/",
        "expires": 1767139200.0,
        "httpOnly": true,
        "secure": true,
        "sameSite": "Lax"
    }"#;
    let cookie: Cookie = serde_json::from_str(json).unwrap();
    assert_eq!(cookie.name, "sso-rw");
    assert_eq!(cookie.domain.as_deref(), Some(".grok.com"));
    assert_eq!(cookie.http_only, Some(true));

    let out = serde_json::to_string(&cookie).unwrap();
    assert!(out.contains("\"httpOnly\":true"));
    assert!(out.contains("\"sameSite\":\"Lax\""));
    assert!(!out.contains("\"url\""));
}
