//! Seams between the prediction engine and the outside world.
//!
//! The engine only ever talks to these traits; the app crate provides the
//! OS-backed implementations and the providers crate the network ones.
//! All use async_trait so they can be stored as `Arc<dyn ...>`.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::agent_api::{ContentBlock, ModelRequest};
use crate::search_types::WebResult;

/// Produces a still image of the current display.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Base64-encoded PNG. Must fail if no capturable source exists.
    async fn capture(&self) -> Result<String>;
}

/// Multimodal language model with tool support.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Identifier used in logs
    fn id(&self) -> &str;

    /// Send one request and return the reply's content blocks.
    async fn complete(&self, request: &ModelRequest) -> Result<Vec<ContentBlock>>;
}

/// Lightweight web search.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>>;
}

/// Synthesises keystrokes into the focused application.
pub trait TextInjector: Send + Sync {
    fn type_text(&self, text: &str) -> Result<()>;
}

/// Everything the engine needs from outside, bundled.
#[derive(Clone)]
pub struct Collaborators {
    pub capture: Arc<dyn ScreenCapture>,
    pub model: Arc<dyn ModelService>,
    pub search: Arc<dyn SearchProvider>,
    pub injector: Arc<dyn TextInjector>,
}
