//! Prompt composition.

/// Compose the text typed into the provider's input box.
///
/// The framing is part of the de-facto contract with these UIs: providers
/// with no native system-prompt surface get the instructions inlined ahead
/// of the user prompt in exactly this shape.
pub fn compose_prompt(system_prompt: Option<&str>, user_prompt: &str) -> String {
    match system_prompt {
        Some(system) if !system.trim().is_empty() => {
            format!("SYSTEM INSTRUCTIONS:: {}\n\nUSER PROMPT{}", system, user_prompt)
        }
        _ => user_prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_system() {
        assert_eq!(compose_prompt(None, "caption this image"), "caption this image");
    }

    #[test]
    fn test_compose_with_system() {
        let composed = compose_prompt(Some("Reply in JSON"), "describe the scene");
        assert_eq!(
            composed,
            "SYSTEM INSTRUCTIONS:: Reply in JSON\n\nUSER PROMPTdescribe the scene"
        );
    }

    #[test]
    fn test_compose_blank_system_is_ignored() {
        assert_eq!(compose_prompt(Some("   "), "hello"), "hello");
        assert_eq!(compose_prompt(Some(""), "hello"), "hello");
    }
}
