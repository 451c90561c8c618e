use crate::session::js::js_string;
use crate::session::{PageSession, Pick};

#[test]
fn test_quad_center() {
    let quad = vec![0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0];
    let (x, y) = PageSession::quad_center(&quad);
    assert_eq!(x, 50.0);
    assert_eq!(y, 50.0);
}

#[test]
fn test_quad_center_malformed() {
    let (x, y) = PageSession::quad_center(&[1.0, 2.0]);
    assert_eq!((x, y), (0.0, 0.0));
}

#[test]
fn test_get_modifiers() {
    let modifiers = ["Control", "Shift"];
    let flags = PageSession::get_modifiers(&modifiers);
    assert_eq!(flags, 10); // 2 + 8
}

#[test]
fn test_get_modifiers_meta() {
    let flags = PageSession::get_modifiers(&["Meta"]);
    assert_eq!(flags, 4);
}

#[test]
fn test_pick_index() {
    assert_eq!(Pick::First.index(3), Some(0));
    assert_eq!(Pick::Last.index(3), Some(2));
    assert_eq!(Pick::Nth(1).index(3), Some(1));
    assert_eq!(Pick::Nth(3).index(3), None);
    assert_eq!(Pick::Last.index(0), None);
}

#[test]
fn test_pick_js_index() {
    assert_eq!(Pick::First.js_index(), "0");
    assert_eq!(Pick::Last.js_index(), "ns.length - 1");
    assert_eq!(Pick::Nth(4).js_index(), "4");
}

#[test]
fn test_js_string_escapes_quotes() {
    let s = js_string(r#"button[aria-label="Ask"]"#);
    assert_eq!(s, r#""button[aria-label=\"Ask\"]""#);
}

#[test]
fn test_js_string_escapes_newline() {
    let s = js_string("line1\nline2");
    assert_eq!(s, r#""line1\nline2""#);
}
