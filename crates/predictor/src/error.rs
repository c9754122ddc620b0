//! Failure taxonomy for a prediction cycle.

use thiserror::Error;

/// Which remote call a transport failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Model,
    Search,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Model => f.write_str("model"),
            Stage::Search => f.write_str("search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("screen capture failed: {0:#}")]
    Capture(anyhow::Error),

    #[error("{stage} call failed: {source:#}")]
    Transport {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    #[error("unusable model reply: {0}")]
    Protocol(String),

    /// A newer cycle took over; routine, not a failure
    #[error("superseded by newer activity")]
    Superseded,
}

impl CycleError {
    pub fn model(source: anyhow::Error) -> Self {
        CycleError::Transport {
            stage: Stage::Model,
            source,
        }
    }

    pub fn search(source: anyhow::Error) -> Self {
        CycleError::Transport {
            stage: Stage::Search,
            source,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, CycleError::Superseded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_messages() {
        let err = CycleError::search(anyhow!("503 Service Unavailable"));
        assert_eq!(
            err.to_string(),
            "search call failed: 503 Service Unavailable"
        );
        assert!(!err.is_cancellation());

        let err = CycleError::Capture(anyhow!("No monitor found"));
        assert!(err.to_string().contains("No monitor found"));

        assert!(CycleError::Superseded.is_cancellation());
    }
}
