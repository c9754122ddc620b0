//! Predictor - keystroke-driven next-input prediction
//!
//! This crate holds the engine behind the assistant:
//! - Records recent keystrokes and detects when the user settles
//! - Runs a prediction cycle against a screenshot and the key history
//! - Lets the model make one web search before answering
//! - Commits a ready prediction on a double press of the confirmation key
//!
//! Platform and network concerns come in through `shared::collaborators`.

pub mod cancel;
pub mod cycle;
pub mod debounce;
pub mod error;
pub mod gesture;
pub mod history;
mod observers;
pub mod orchestrator;
pub mod prompts;
pub mod protocol;

pub use cancel::{CancellationTokens, CycleToken};
pub use cycle::PredictionCycle;
pub use debounce::{Debouncer, Settle, DEFAULT_QUIET_PERIOD};
pub use error::{CycleError, Stage};
pub use gesture::{ConfirmGesture, GestureOutcome};
pub use history::{InputHistory, DEFAULT_HISTORY_LIMIT};
pub use observers::Subscription;
pub use orchestrator::{Predictor, PredictorConfig};
pub use protocol::{decode_reply, extract_prediction, ModelReply, SearchRequest};
