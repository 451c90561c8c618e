//! CDP page session for interacting with a single page.

mod core;
mod dom;
mod files;
mod input;
mod js;
mod navigation;
mod network;

pub use self::core::PageSession;
pub use self::dom::Pick;
pub use self::js::js_string;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
