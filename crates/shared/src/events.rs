//! Notifications emitted by the prediction engine.

use serde::{Deserialize, Serialize};

use crate::completion::CompletionState;

/// Predictor event for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictorEvent {
    /// Emitted on every state assignment, including repeats
    StateChanged(CompletionState),
    /// The user confirmed the prediction; emitted once, before injection
    Committed(String),
}

impl PredictorEvent {
    pub fn state(&self) -> Option<CompletionState> {
        match self {
            PredictorEvent::StateChanged(state) => Some(*state),
            PredictorEvent::Committed(_) => None,
        }
    }
}
