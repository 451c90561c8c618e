//! ChatPilot configuration.
//!
//! TOML settings with serde-default fields, `${VAR}` environment expansion,
//! and `~` path expansion. [`Settings::default()`] is a runnable
//! configuration; a config file only overrides the knobs it names.

mod error;
mod loader;
mod settings;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ArtifactSettings, BrowserSettings, FlowSettings, GoogleSettings, ProviderEntry,
    QueueSettings, Settings,
};
