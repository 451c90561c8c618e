use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape the caller wants the reply in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, trimmed.
    #[default]
    Text,
    /// Parsed JSON recovered from the reply.
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prompt to run against a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User prompt text.
    pub prompt: String,
    /// Optional system instructions, composed into the prompt for providers
    /// without a native system-prompt surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Local file to attach before submitting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<PathBuf>,
    /// Requested reply shape.
    #[serde(default)]
    pub output: OutputFormat,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            attachment: None,
            output: OutputFormat::Text,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }
}

/// What a completed flow hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Reply text after provider post-processing.
    pub text: String,
    /// Parsed payload when [`OutputFormat::Json`] was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            json: None,
        }
    }

    pub fn json(text: impl Into<String>, json: Value) -> Self {
        Self {
            text: text.into(),
            json: Some(json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_roundtrip() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(OutputFormat::Json.as_str(), "json");
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_output_format_serde() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::Json).unwrap(),
            "\"json\""
        );
        let parsed: OutputFormat = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(parsed, OutputFormat::Text);
    }

    #[test]
    fn test_request_builder() {
        let req = ChatRequest::new("describe this")
            .with_system_prompt("be terse")
            .with_attachment("/tmp/cat.png")
            .with_output(OutputFormat::Json);
        assert_eq!(req.prompt, "describe this");
        assert_eq!(req.system_prompt.as_deref(), Some("be terse"));
        assert_eq!(req.attachment.as_deref(), Some(std::path::Path::new("/tmp/cat.png")));
        assert_eq!(req.output, OutputFormat::Json);
    }

    #[test]
    fn test_request_serde_defaults() {
        let req: ChatRequest = serde_json::from_str("{\"prompt\": \"hi\"}").unwrap();
        assert_eq!(req.prompt, "hi");
        assert!(req.system_prompt.is_none());
        assert!(req.attachment.is_none());
        assert_eq!(req.output, OutputFormat::Text);
    }

    #[test]
    fn test_reply_constructors() {
        let plain = ChatReply::text("hello");
        assert_eq!(plain.text, "hello");
        assert!(plain.json.is_none());

        let parsed = ChatReply::json("{\"a\":1}", json!({"a": 1}));
        assert_eq!(parsed.json.unwrap(), json!({"a": 1}));
    }
}
