use crate::anthropic::AnthropicClient;
use crate::ollama::OllamaClient;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::agent_api::{ContentBlock, ModelRequest};
use shared::collaborators::ModelService;
use shared::settings::ModelProvider;
use tracing::warn;

pub struct ProviderRouter {
    config: ModelProvider,
}

impl ProviderRouter {
    pub fn new(config: ModelProvider) -> Self {
        Self { config }
    }

    /// Returns the name of the first configured provider.
    pub fn active_provider(&self) -> Option<&str> {
        self.config.provider_preference.first().map(|s| s.as_str())
    }

    pub async fn generate(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>> {
        let mut last_error = None;

        // Try providers in order of preference, falling back on failure
        for provider in self.config.provider_preference.iter() {
            let result = match provider.as_str() {
                "local" => {
                    let client = OllamaClient::new(self.config.local_model.clone());
                    client.generate(request).await
                }
                "anthropic" => {
                    match AnthropicClient::from_auth(
                        &self.config.anthropic_model,
                        &self.config.anthropic_auth,
                    ) {
                        Ok(client) => client.generate(request).await,
                        Err(e) => Err(e),
                    }
                }
                _ => {
                    last_error = Some(anyhow!("Unknown provider: {}", provider));
                    continue;
                }
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(provider = %provider, error = %e, "model provider failed");
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("No providers configured")))
    }
}

#[async_trait]
impl ModelService for ProviderRouter {
    fn id(&self) -> &str {
        self.active_provider().unwrap_or("none")
    }

    async fn complete(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>> {
        self.generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            messages: Vec::new(),
            tools: Vec::new(),
            max_tokens: 16,
        }
    }

    #[tokio::test]
    async fn test_no_providers_configured() {
        let router = ProviderRouter::new(ModelProvider {
            provider_preference: Vec::new(),
            ..ModelProvider::default()
        });
        assert_eq!(router.id(), "none");

        let err = router.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("No providers configured"));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_skipped() {
        let router = ProviderRouter::new(ModelProvider {
            provider_preference: vec!["carrier-pigeon".into()],
            ..ModelProvider::default()
        });
        assert_eq!(router.active_provider(), Some("carrier-pigeon"));

        let err = router.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }
}
