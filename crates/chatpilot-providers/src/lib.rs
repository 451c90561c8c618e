//! The catalog of supported chat sites.
//!
//! Each module under [`sites`] drives one site through the shared
//! [`chatpilot_flow::ChatProvider`] life-cycle: a selector table, a
//! completion gate, and overrides for the steps where that site's page
//! deviates from the common shape. [`ProviderRegistry`] holds the catalog;
//! [`builtin_registry`] constructs every supported site from per-provider
//! settings.

mod actions;
mod cookies;
mod google_auth;
mod registry;
mod settings;
pub mod sites;

pub use cookies::load_cookie_file;
pub use google_auth::{login_google, GoogleCredentials};
pub use registry::{builtin_registry, ProviderRegistry, RegistryError};
pub use settings::ProviderSettings;
