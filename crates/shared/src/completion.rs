use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the prediction engine. Exactly one is current per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionState {
    #[default]
    Idle,
    /// User is typing; the quiet-period timer is armed
    Observing,
    /// Screen captured, waiting on the model
    Thinking,
    /// Model asked for a web search
    Searching,
    /// A prediction is available for confirmation
    Ready,
}

impl CompletionState {
    pub fn all() -> &'static [CompletionState] {
        &[
            CompletionState::Idle,
            CompletionState::Observing,
            CompletionState::Thinking,
            CompletionState::Searching,
            CompletionState::Ready,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionState::Idle => "IDLE",
            CompletionState::Observing => "OBSERVING",
            CompletionState::Thinking => "THINKING",
            CompletionState::Searching => "SEARCHING",
            CompletionState::Ready => "READY",
        }
    }
}

impl fmt::Display for CompletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_display() {
        for state in CompletionState::all() {
            let json = serde_json::to_string(state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(CompletionState::default(), CompletionState::Idle);
    }
}
