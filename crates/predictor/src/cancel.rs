//! Generation-based cancellation for prediction cycles.
//!
//! Exactly one generation is current at a time. Minting a token or
//! invalidating bumps the generation, so every older token observes
//! itself as stale at its next checkpoint. Nothing is interrupted; the
//! stale cycle simply stops advancing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::CycleError;

#[derive(Debug, Default)]
pub struct CancellationTokens {
    generation: Arc<AtomicU64>,
}

impl CancellationTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the token for a new cycle, superseding all earlier ones.
    pub fn mint(&self) -> CycleToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        CycleToken {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Supersede the in-flight cycle without starting another.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct CycleToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl CycleToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    pub fn checkpoint(&self) -> Result<(), CycleError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(CycleError::Superseded)
        }
    }
}
