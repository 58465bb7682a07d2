//! Prompt rendering and model-reply parsing

use crate::runtime::State;

const LAST_MESSAGE: &str = "{{lastMessage}}";
const RECENT_MESSAGES: &str = "{{recentMessages}}";

/// Substitute `{{lastMessage}}` and `{{recentMessages}}` in `template`
pub fn compose_context(template: &str, state: &State) -> String {
    let last = state.last_message.as_deref().unwrap_or_default();
    template
        .replace(LAST_MESSAGE, last)
        .replace(RECENT_MESSAGES, &state.format_recent_messages())
}

/// Pull the JSON payload out of a model reply that may wrap it in a
/// markdown fence
pub fn extract_json_block(content: &str) -> &str {
    let content = content.trim();

    if let Some(start) = content.find("```json") {
        let body = start + "```json".len();
        if let Some(end) = content[body..].find("```") {
            return content[body..body + end].trim();
        }
    }

    if let Some(start) = content.find("```") {
        let fence = start + 3;
        let body = content[fence..]
            .find('\n')
            .map(|n| fence + n + 1)
            .unwrap_or(fence);
        if let Some(end) = content[body..].find("```") {
            return content[body..body + end].trim();
        }
    }

    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            return &content[start..=end];
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Memory;

    #[test]
    fn test_compose_context() {
        let mut state = State::for_agent("Hedy");
        state.push(Memory::user("airdrop 5 tokens"));
        state.refresh_last_message();

        let rendered = compose_context(
            "Given the last message:\n{{lastMessage}}\nHistory:\n{{recentMessages}}",
            &state,
        );
        assert_eq!(
            rendered,
            "Given the last message:\nairdrop 5 tokens\nHistory:\nUser: airdrop 5 tokens"
        );
    }

    #[test]
    fn test_extract_json_fence() {
        let reply = "Sure!\n```json\n{\"tokenId\": \"0.0.5\"}\n```\nanything else?";
        assert_eq!(extract_json_block(reply), "{\"tokenId\": \"0.0.5\"}");
    }

    #[test]
    fn test_extract_bare_fence() {
        let reply = "```\n{\"amount\": \"1\"}\n```";
        assert_eq!(extract_json_block(reply), "{\"amount\": \"1\"}");
    }

    #[test]
    fn test_extract_braces() {
        let reply = "The values are {\"memo\": \"hi\"} as requested";
        assert_eq!(extract_json_block(reply), "{\"memo\": \"hi\"}");
    }

    #[test]
    fn test_extract_plain() {
        assert_eq!(extract_json_block("  nothing here "), "nothing here");
    }
}
