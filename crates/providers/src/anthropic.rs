use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::agent_api::{ChatMessage, ContentBlock, ModelRequest, ToolDefinition};
use shared::collaborators::ModelService;
use shared::settings::ProviderAuth;
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

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDefinition>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

pub struct AnthropicClient {
    http: Client,
    auth_token: String,
    model: String,
}

impl AnthropicClient {
    pub fn from_auth(model: &str, auth: &ProviderAuth) -> Result<Self> {
        let auth_token = if let Some(api_key) = &auth.api_key {
            api_key.clone()
        } else {
            // Try environment variable as fallback
            env::var("ANTHROPIC_API_KEY")
                .map_err(|_| anyhow!("No Anthropic authentication configured"))?
        };

        Ok(Self {
            http: SHARED_HTTP.clone(),
            auth_token,
            model: model.to_string(),
        })
    }

    fn build_request<'a>(&'a self, request: &'a ModelRequest) -> AnthropicRequest<'a> {
        // Unknown block types from earlier replies are never echoed back
        let messages = request
            .messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role,
                content: m
                    .content
                    .iter()
                    .filter(|b| b.is_supported())
                    .cloned()
                    .collect(),
            })
            .collect();

        AnthropicRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages,
            tools: request.tools.clone(),
        }
    }

    pub async fn generate(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>> {
        let req = self.build_request(request);

        let resp = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.auth_token)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail: String = body.chars().take(800).collect();
            if detail.trim().is_empty() {
                return Err(anyhow!("anthropic error: {}", status));
            }
            return Err(anyhow!("anthropic error: {}\n{}", status, detail));
        }

        let body: AnthropicResponse = resp.json().await?;
        Ok(body.content)
    }
}

#[async_trait]
impl ModelService for AnthropicClient {
    fn id(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>> {
        self.generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::agent_api::ImageSource;

    fn client() -> AnthropicClient {
        AnthropicClient::from_auth(
            "claude-test",
            &ProviderAuth {
                api_key: Some("sk-test".into()),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_request_carries_image_text_and_tools() {
        let client = client();
        let request = ModelRequest {
            messages: vec![ChatMessage::user(vec![
                ContentBlock::Image {
                    source: ImageSource::png_base64("AAAA"),
                },
                ContentBlock::text("predict"),
            ])],
            tools: vec![ToolDefinition {
                name: "web_search".into(),
                description: "Search the web for information".into(),
                input_schema: serde_json::json!({"type": "object"}),
            }],
            max_tokens: 4096,
        };

        let json = serde_json::to_value(client.build_request(&request)).unwrap();
        assert_eq!(json["model"], "claude-test");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "image");
        assert_eq!(json["messages"][0]["content"][1]["text"], "predict");
        assert_eq!(json["tools"][0]["name"], "web_search");
    }

    #[test]
    fn test_request_omits_empty_tools_and_unsupported_blocks() {
        let client = client();
        let request = ModelRequest {
            messages: vec![ChatMessage::assistant(vec![
                ContentBlock::Unsupported,
                ContentBlock::text("hi"),
            ])],
            tools: Vec::new(),
            max_tokens: 16,
        };

        let json = serde_json::to_value(client.build_request(&request)).unwrap();
        assert!(json.get("tools").is_none());
        let content = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
    }

    #[test]
    fn test_response_decodes_text_and_tool_use() {
        let body = r#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Let me look that up."},
                {"type": "tool_use", "id": "toolu_1", "name": "web_search", "input": {"query": "weather today"}}
            ],
            "stop_reason": "tool_use"
        }"#;

        let resp: AnthropicResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.content.len(), 2);
        match &resp.content[1] {
            ContentBlock::ToolUse { id, name, input } => {
                assert_eq!(id, "toolu_1");
                assert_eq!(name, "web_search");
                assert_eq!(input["query"], "weather today");
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }
}
