//! Instructions and tool schema sent with every prediction request.

use shared::agent_api::{ChatMessage, ContentBlock, ImageSource, ToolDefinition};

/// Name of the single tool the model may call
pub const SEARCH_TOOL_NAME: &str = "web_search";

/// Build the instruction text around the serialized keystroke history.
pub fn build_prompt(keystrokes_json: &str) -> String {
    format!(
        r#"You are an assistant that helps people finish what they are doing on their computer. Look at a screenshot of their screen together with their most recent keystrokes and predict what they will type next.

You are given:

1. A screenshot of the user's screen.

2. The user's recent keystrokes, oldest first:
<keystrokes>
{keystrokes}
</keystrokes>

Study the screenshot first:
- Which application or window is active
- Where the text cursor or input field is
- What the user is working on (an email, code, a form, a chat)
- Anything visible that hints at what comes next

Then read the keystrokes:
- Words or partial words just typed
- Phrases or patterns that are forming
- Whether the user is mid-word, at the end of a sentence, or on a new line

From both, predict the most likely next input. It may be:
- The rest of a partially typed word
- The next word or words of a sentence
- A common phrase that fits the context
- A short action label that fits the task

If the prediction depends on facts you do not have, such as current events, prices or the weather, call the "{tool}" tool first and make your prediction after the results come back. For ordinary text, answer directly without the tool.

Reply with the prediction in exactly this format:
<prediction>
[the predicted next input]
</prediction>

Keep the prediction short and specific to what is on screen. If there is not enough context for a useful prediction, say so inside the tags."#,
        keystrokes = keystrokes_json,
        tool = SEARCH_TOOL_NAME,
    )
}

/// Tool schema: one search function taking a free-text query.
pub fn search_tool() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_TOOL_NAME.to_string(),
        description: "Search the web for information".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for"
                }
            },
            "required": ["query"]
        }),
    }
}

/// First message of a cycle: screenshot, then instructions.
pub fn opening_message(screenshot_base64: String, keystrokes_json: &str) -> ChatMessage {
    ChatMessage::user(vec![
        ContentBlock::Image {
            source: ImageSource::png_base64(screenshot_base64),
        },
        ContentBlock::text(build_prompt(keystrokes_json)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::agent_api::Role;

    #[test]
    fn test_prompt_embeds_history_and_format() {
        let prompt = build_prompt(r#"["H","e","l","l","o"]"#);
        assert!(prompt.contains("<keystrokes>\n[\"H\",\"e\",\"l\",\"l\",\"o\"]\n</keystrokes>"));
        assert!(prompt.contains("<prediction>\n[the predicted next input]\n</prediction>"));
        assert!(prompt.contains("\"web_search\""));
    }

    #[test]
    fn test_search_tool_schema() {
        let tool = search_tool();
        assert_eq!(tool.name, "web_search");
        assert_eq!(tool.input_schema["properties"]["query"]["type"], "string");
        assert_eq!(tool.input_schema["required"][0], "query");
    }

    #[test]
    fn test_opening_message_image_first() {
        let msg = opening_message("AAAA".into(), "[]");
        assert_eq!(msg.role, Role::User);
        assert!(matches!(msg.content[0], ContentBlock::Image { .. }));
        assert!(matches!(msg.content[1], ContentBlock::Text { .. }));
    }
}
