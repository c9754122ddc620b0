//! Jina web search client (s.jina.ai).
//!
//! Requests are sent with `X-Respond-With: no-content` so only titles,
//! URLs and descriptions come back.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::collaborators::SearchProvider;
use shared::search_types::WebResult;
use shared::settings::SearchSettings;
use std::env;
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, Serialize)]
struct JinaRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct JinaResponse {
    #[serde(default)]
    data: Vec<JinaResult>,
}

#[derive(Debug, Deserialize)]
struct JinaResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

pub struct JinaSearch {
    http: Client,
    base_url: String,
    api_key: String,
    max_results: usize,
}

impl JinaSearch {
    pub fn new(base_url: &str, api_key: &str, max_results: usize) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_results,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        let api_key = match &settings.api_key {
            Some(key) => key.clone(),
            None => env::var("JINA_API_KEY").map_err(|_| anyhow!("JINA_API_KEY not set"))?,
        };
        Ok(Self::new(&settings.base_url, &api_key, settings.max_results))
    }

    pub async fn query(&self, query: &str) -> Result<Vec<WebResult>> {
        let url = format!("{}/", self.base_url);
        let req = JinaRequest {
            q: query,
            num: self.max_results,
        };

        let resp = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Respond-With", "no-content")
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail: String = body.chars().take(800).collect();
            return Err(anyhow!("search failed: {}\n{}", status, detail.trim()));
        }

        let body: JinaResponse = resp.json().await?;
        Ok(into_results(body, self.max_results))
    }
}

fn into_results(body: JinaResponse, max_results: usize) -> Vec<WebResult> {
    body.data
        .into_iter()
        .take(max_results)
        .map(|r| WebResult {
            title: r.title,
            url: r.url,
            description: r.description,
        })
        .collect()
}

#[async_trait]
impl SearchProvider for JinaSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>> {
        self.query(query).await
    }
}
