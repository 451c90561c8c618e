//! One module per supported site.
//!
//! A site module is mostly data: the selector table and completion gate,
//! plus overrides for the steps where the page deviates from the common
//! flow. Selectors here track the live sites and are expected to rot; when
//! a site redesigns, its module is the only thing that changes.

mod aimode;
mod aistudio;
mod bing;
mod brave;
mod copilot;
mod duckduckgo;
mod gemini;
mod grok;
mod meta;
mod mistral;
mod moondream;
mod pally;
mod perplexity;
mod qwen;

pub use aimode::AiMode;
pub use aistudio::AiStudio;
pub use bing::Bing;
pub use brave::Brave;
pub use copilot::Copilot;
pub use duckduckgo::DuckDuckGo;
pub use gemini::Gemini;
pub use grok::Grok;
pub use meta::Meta;
pub use mistral::Mistral;
pub use moondream::MoonDream;
pub use pally::Pally;
pub use perplexity::Perplexity;
pub use qwen::Qwen;
