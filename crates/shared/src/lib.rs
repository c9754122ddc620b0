pub mod collaborators;
pub mod completion;
pub mod events;
pub mod keys;

pub mod settings {
    use serde::{Deserialize, Serialize};

    fn default_max_tokens() -> u32 {
        4096
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ProviderAuth {
        pub api_key: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelProvider {
        pub provider_preference: Vec<String>, // e.g., ["anthropic", "local"]
        pub anthropic_model: String,          // e.g., "claude-3-7-sonnet-latest"
        pub local_model: String,              // e.g., "gemma3:27b" for Ollama
        pub anthropic_auth: ProviderAuth,
        #[serde(default = "default_max_tokens")]
        pub max_tokens: u32,
    }

    /// Web search backend settings
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SearchSettings {
        pub base_url: String,
        /// Bearer token; falls back to JINA_API_KEY
        pub api_key: Option<String>,
        pub max_results: usize,
    }

    /// Timing and key settings for the prediction engine
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PredictorSettings {
        /// Quiet period before a prediction cycle starts
        pub quiet_period_ms: u64,
        /// Number of keystrokes kept in the sliding history
        pub history_limit: usize,
        /// Hook name of the confirmation key (double press commits)
        pub confirm_key: String,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct AppSettings {
        pub model: ModelProvider,
        #[serde(default)]
        pub search: SearchSettings,
        #[serde(default)]
        pub predictor: PredictorSettings,
    }

    impl Default for ModelProvider {
        fn default() -> Self {
            Self {
                provider_preference: vec!["anthropic".into(), "local".into()], // Cloud first, fall back to local
                anthropic_model: "claude-3-7-sonnet-latest".into(),
                local_model: "gemma3:27b".into(),
                anthropic_auth: ProviderAuth::default(),
                max_tokens: default_max_tokens(),
            }
        }
    }

    impl Default for SearchSettings {
        fn default() -> Self {
            Self {
                base_url: "https://s.jina.ai".into(),
                api_key: None,
                max_results: 20,
            }
        }
    }

    impl Default for PredictorSettings {
        fn default() -> Self {
            Self {
                quiet_period_ms: 1000,
                history_limit: 100,
                confirm_key: "LEFT ALT".into(),
            }
        }
    }
}

/// Conversation types exchanged with the language model.
pub mod agent_api {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        User,
        Assistant,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ImageSource {
        #[serde(rename = "type")]
        pub source_type: String, // always "base64"
        pub media_type: String,
        pub data: String,
    }

    impl ImageSource {
        pub fn png_base64(data: impl Into<String>) -> Self {
            Self {
                source_type: "base64".into(),
                media_type: "image/png".into(),
                data: data.into(),
            }
        }
    }

    /// A typed content block, as carried in requests and replies.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum ContentBlock {
        Text {
            text: String,
        },
        Image {
            source: ImageSource,
        },
        ToolUse {
            id: String,
            name: String,
            input: serde_json::Value,
        },
        ToolResult {
            tool_use_id: String,
            content: String,
        },
        /// Any block type this client does not understand (e.g. "thinking")
        #[serde(other)]
        Unsupported,
    }

    impl ContentBlock {
        pub fn text(text: impl Into<String>) -> Self {
            ContentBlock::Text { text: text.into() }
        }

        pub fn is_supported(&self) -> bool {
            !matches!(self, ContentBlock::Unsupported)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: Role,
        pub content: Vec<ContentBlock>,
    }

    impl ChatMessage {
        pub fn user(content: Vec<ContentBlock>) -> Self {
            Self {
                role: Role::User,
                content,
            }
        }

        pub fn assistant(content: Vec<ContentBlock>) -> Self {
            Self {
                role: Role::Assistant,
                content,
            }
        }
    }

    /// Tool the model may call before answering.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ToolDefinition {
        pub name: String,
        pub description: String,
        pub input_schema: serde_json::Value,
    }

    #[derive(Debug, Clone)]
    pub struct ModelRequest {
        pub messages: Vec<ChatMessage>,
        pub tools: Vec<ToolDefinition>,
        pub max_tokens: u32,
    }
}

pub mod search_types {
    use serde::{Deserialize, Serialize};

    /// A single lightweight web result
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WebResult {
        pub title: String,
        pub url: String,
        pub description: String,
    }
}
