//! One run of capture → model → (search → model) → prediction.

use shared::agent_api::{ChatMessage, ContentBlock, ModelRequest};
use shared::collaborators::Collaborators;
use tracing::{debug, info};

use crate::cancel::CycleToken;
use crate::error::CycleError;
use crate::prompts::{opening_message, search_tool};
use crate::protocol::{decode_reply, ModelReply};

pub struct PredictionCycle {
    token: CycleToken,
    /// Keystrokes as of cycle creation, already serialized for the prompt
    keystrokes_json: String,
    /// Conversation so far; the first message holds the screenshot
    transcript: Vec<ChatMessage>,
    max_tokens: u32,
}

impl PredictionCycle {
    pub fn new(token: CycleToken, keystrokes_json: String, max_tokens: u32) -> Self {
        Self {
            token,
            keystrokes_json,
            transcript: Vec::new(),
            max_tokens,
        }
    }

    pub fn id(&self) -> u64 {
        self.token.generation()
    }

    pub fn token(&self) -> &CycleToken {
        &self.token
    }

    /// Drive the cycle to a prediction.
    ///
    /// `on_search` runs once if the model asks for a web search, before the
    /// search is issued; it moves the engine into its searching state and may
    /// refuse if the cycle went stale.
    pub async fn run<F>(
        &mut self,
        collaborators: &Collaborators,
        on_search: F,
    ) -> Result<String, CycleError>
    where
        F: FnOnce(&CycleToken) -> Result<(), CycleError>,
    {
        let screenshot = collaborators
            .capture
            .capture()
            .await
            .map_err(CycleError::Capture)?;
        self.token.checkpoint()?;
        debug!(cycle = self.id(), bytes = screenshot.len(), "screen captured");

        self.transcript
            .push(opening_message(screenshot, &self.keystrokes_json));

        let reply = self.ask(collaborators).await?;
        let request = match decode_reply(&reply, true)? {
            ModelReply::Prediction(text) => return Ok(text),
            ModelReply::Search(request) => request,
        };

        on_search(&self.token)?;
        info!(cycle = self.id(), query = %request.query, "model requested a web search");
        self.transcript.push(ChatMessage::assistant(reply));

        let results = collaborators
            .search
            .search(&request.query)
            .await
            .map_err(CycleError::search)?;
        self.token.checkpoint()?;
        debug!(cycle = self.id(), results = results.len(), "search returned");

        let content = serde_json::to_string(&results)
            .map_err(|e| CycleError::Protocol(format!("could not encode search results: {}", e)))?;
        self.transcript.push(ChatMessage::user(vec![ContentBlock::ToolResult {
            tool_use_id: request.tool_use_id,
            content,
        }]));

        // Only one search round; a second tool call is not honoured
        let reply = self.ask(collaborators).await?;
        match decode_reply(&reply, false)? {
            ModelReply::Prediction(text) => Ok(text),
            ModelReply::Search(_) => Err(CycleError::Protocol(
                "second search round is not supported".to_string(),
            )),
        }
    }

    async fn ask(&self, collaborators: &Collaborators) -> Result<Vec<ContentBlock>, CycleError> {
        // The tool schema goes out on every round: transcripts that contain
        // tool blocks are rejected when no tools are declared.
        let request = ModelRequest {
            messages: self.transcript.clone(),
            tools: vec![search_tool()],
            max_tokens: self.max_tokens,
        };
        debug!(
            cycle = self.id(),
            model = collaborators.model.id(),
            messages = request.messages.len(),
            "asking model"
        );
        let reply = collaborators
            .model
            .complete(&request)
            .await
            .map_err(CycleError::model)?;
        self.token.checkpoint()?;
        Ok(reply)
    }
}
