//! Reply post-processing: disclaimer stripping and JSON recovery.
//!
//! Scraped replies are whatever the page rendered: markdown fences, chatty
//! prose around the payload, trailing UI boilerplate. When a job asks for
//! JSON the reply is coerced through a bounded repair chain — strict parse
//! first, then progressively forgiving passes — rather than trusting the
//! model to have produced clean output.

use serde_json::Value;

use crate::error::FlowError;

/// Cut the reply at a trailing boilerplate marker, if present.
pub fn truncate_at_disclaimer(text: &str, marker: &str) -> String {
    match text.find(marker) {
        Some(idx) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// The contents of the last closed ``` fence in the reply.
pub fn last_code_block(text: &str) -> Option<String> {
    let segments: Vec<&str> = text.split("```").collect();
    let mut candidate = None;
    for (i, seg) in segments.iter().enumerate() {
        // Odd segments sit inside a fence; require the closing fence too
        if i % 2 == 1 && i + 1 < segments.len() {
            candidate = Some(*seg);
        }
    }
    candidate.map(|block| strip_fence_language(block).trim().to_string())
}

/// Drop a leading language tag line ("json", "python", ...) from a fenced
/// block.
fn strip_fence_language(block: &str) -> &str {
    if let Some(idx) = block.find('\n') {
        let first = block[..idx].trim();
        if !first.is_empty()
            && first
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
        {
            return &block[idx + 1..];
        }
    }
    block
}

/// Parse reply text as JSON: the last fenced block when one exists, else the
/// raw text, through [`lenient_json`].
pub fn json_from_reply(text: &str) -> Result<Value, FlowError> {
    let candidate = last_code_block(text).unwrap_or_else(|| text.trim().to_string());
    lenient_json(&candidate).map_err(FlowError::Json)
}

/// Parse almost-JSON.
///
/// Attempts, in order: the text as-is; with trailing commas removed; clamped
/// to the outermost `{...}`/`[...]`; and finally with single-quoted strings
/// rewritten. Each repair is cheap and deterministic; anything that survives
/// none of them is reported with the strict parser's error.
pub fn lenient_json(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty input".to_string());
    }

    if let Ok(v) = serde_json::from_str(trimmed) {
        return Ok(v);
    }

    let repaired = strip_trailing_commas(trimmed);
    if let Ok(v) = serde_json::from_str(&repaired) {
        return Ok(v);
    }

    if let Some(clamped) = clamp_to_json(trimmed) {
        if let Ok(v) = serde_json::from_str(clamped) {
            return Ok(v);
        }
        let repaired = strip_trailing_commas(clamped);
        if let Ok(v) = serde_json::from_str(&repaired) {
            return Ok(v);
        }
        let requoted = strip_trailing_commas(&normalize_quotes(clamped));
        if let Ok(v) = serde_json::from_str(&requoted) {
            return Ok(v);
        }
    }

    let requoted = strip_trailing_commas(&normalize_quotes(trimmed));
    serde_json::from_str(&requoted).map_err(|e| e.to_string())
}

/// Slice from the first `{`/`[` to the matching last closer.
fn clamp_to_json(text: &str) -> Option<&str> {
    let obj = text.find('{');
    let arr = text.find('[');
    let (open_idx, close_char) = match (obj, arr) {
        (Some(o), Some(a)) if a < o => (a, ']'),
        (Some(o), _) => (o, '}'),
        (None, Some(a)) => (a, ']'),
        (None, None) => return None,
    };
    let close_idx = text.rfind(close_char)?;
    (close_idx > open_idx).then(|| &text[open_idx..=close_idx])
}

/// Remove commas that directly precede a closing brace/bracket, outside
/// strings.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if !(j < chars.len() && (chars[j] == '}' || chars[j] == ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Rewrite single-quoted strings as double-quoted ones.
///
/// Only sound on JSON-shaped text; runs last in the repair chain.
fn normalize_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_double = false;
    let mut in_single = false;
    let mut escaped = false;

    for c in text.chars() {
        if escaped {
            if in_single && c == '\'' {
                out.push('\'');
            } else {
                out.push('\\');
                out.push(c);
            }
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_double || in_single => escaped = true,
            '"' if in_single => {
                out.push('\\');
                out.push('"');
            }
            '"' => {
                in_double = !in_double;
                out.push('"');
            }
            '\'' if !in_double => {
                in_single = !in_single;
                out.push('"');
            }
            _ => out.push(c),
        }
    }
    out
}
