//! Decoding model replies into the two outcomes the engine acts on.

use shared::agent_api::ContentBlock;

use crate::error::CycleError;
use crate::prompts::SEARCH_TOOL_NAME;

const OPEN_TAG: &str = "<prediction>";
const CLOSE_TAG: &str = "</prediction>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub tool_use_id: String,
    pub query: String,
}

/// What a model reply asks the engine to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    Prediction(String),
    Search(SearchRequest),
}

/// Decode a reply once, at the protocol boundary.
///
/// With `allow_search`, a `web_search` tool call wins over any text.
/// Otherwise the first text block holding a well-formed prediction span
/// is used.
pub fn decode_reply(blocks: &[ContentBlock], allow_search: bool) -> Result<ModelReply, CycleError> {
    if allow_search {
        if let Some(request) = find_search_request(blocks) {
            return Ok(ModelReply::Search(request));
        }
    }

    for block in blocks {
        if let ContentBlock::Text { text } = block {
            if let Some(prediction) = extract_prediction(text) {
                return Ok(ModelReply::Prediction(prediction));
            }
        }
    }

    let kinds: Vec<&str> = blocks.iter().map(block_kind).collect();
    Err(CycleError::Protocol(format!(
        "no prediction block or search request in reply [{}]",
        kinds.join(", ")
    )))
}

fn find_search_request(blocks: &[ContentBlock]) -> Option<SearchRequest> {
    blocks.iter().find_map(|block| match block {
        ContentBlock::ToolUse { id, name, input } if name == SEARCH_TOOL_NAME => input
            .get("query")
            .and_then(|q| q.as_str())
            .map(|query| SearchRequest {
                tool_use_id: id.clone(),
                query: query.to_string(),
            }),
        _ => None,
    })
}

fn block_kind(block: &ContentBlock) -> &'static str {
    match block {
        ContentBlock::Text { .. } => "text",
        ContentBlock::Image { .. } => "image",
        ContentBlock::ToolUse { .. } => "tool_use",
        ContentBlock::ToolResult { .. } => "tool_result",
        ContentBlock::Unsupported => "unsupported",
    }
}

/// Text between the prediction tags, minus the newline that follows the
/// opening tag and the one that precedes the closing tag.
pub fn extract_prediction(text: &str) -> Option<String> {
    let start = text.find(OPEN_TAG)? + OPEN_TAG.len();
    let rest = &text[start..];
    let end = rest.find(CLOSE_TAG)?;
    let inner = &rest[..end];
    let inner = inner
        .strip_prefix("\r\n")
        .or_else(|| inner.strip_prefix('\n'))
        .unwrap_or(inner);
    let inner = inner
        .strip_suffix("\r\n")
        .or_else(|| inner.strip_suffix('\n'))
        .unwrap_or(inner);
    Some(inner.to_string())
}
