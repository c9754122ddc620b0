use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::agent_api::{ChatMessage, ContentBlock, ModelRequest, Role};
use shared::collaborators::ModelService;
use std::env;
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

/// Flatten typed blocks into Ollama's text + images shape.
///
/// Ollama has no tool protocol here, so tool calls and results are
/// rendered as plain text the model can still read.
fn to_ollama_message(m: &ChatMessage) -> OllamaMessage {
    let mut text = Vec::new();
    let mut images = Vec::new();
    for block in &m.content {
        match block {
            ContentBlock::Text { text: t } => text.push(t.clone()),
            ContentBlock::Image { source } => images.push(source.data.clone()),
            ContentBlock::ToolUse { name, input, .. } => {
                text.push(format!("[Tool call] {} {}", name, input))
            }
            ContentBlock::ToolResult { content, .. } => {
                text.push(format!("[Tool result]\n{}", content))
            }
            ContentBlock::Unsupported => {}
        }
    }
    OllamaMessage {
        role: match m.role {
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
        },
        content: text.join("\n\n"),
        images,
    }
}

pub struct OllamaClient {
    http: Client,
    base: String,
    model: String,
}

impl OllamaClient {
    pub fn new(model: String) -> Self {
        let base =
            env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());
        Self {
            http: SHARED_HTTP.clone(),
            base,
            model,
        }
    }

    pub async fn generate(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>> {
        let conversation: Vec<OllamaMessage> =
            request.messages.iter().map(to_ollama_message).collect();
        let url = format!("{}/api/chat", self.base);
        let req = OllamaChatRequest {
            model: &self.model,
            messages: conversation,
            stream: false,
        };
        let resp = self.http.post(url).json(&req).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("ollama error: {}", resp.status()));
        }
        let body: OllamaChatResponse = resp.json().await?;
        Ok(vec![ContentBlock::text(body.message.content)])
    }
}

#[async_trait]
impl ModelService for OllamaClient {
    fn id(&self) -> &str {
        "local"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>> {
        self.generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::agent_api::ImageSource;

    #[test]
    fn test_images_move_to_images_field() {
        let msg = ChatMessage::user(vec![
            ContentBlock::Image {
                source: ImageSource::png_base64("iVBOR"),
            },
            ContentBlock::text("what next?"),
        ]);
        let out = to_ollama_message(&msg);
        assert_eq!(out.role, "user");
        assert_eq!(out.content, "what next?");
        assert_eq!(out.images, vec!["iVBOR".to_string()]);
    }

    #[test]
    fn test_tool_blocks_flatten_to_text() {
        let msg = ChatMessage::user(vec![ContentBlock::ToolResult {
            tool_use_id: "t1".into(),
            content: "[]".into(),
        }]);
        let out = to_ollama_message(&msg);
        assert!(out.content.starts_with("[Tool result]"));
        assert!(out.images.is_empty());

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("images").is_none());
    }
}
