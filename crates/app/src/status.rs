//! Console status indicator fed by predictor events.

use predictor::{Predictor, Subscription};
use shared::completion::CompletionState;
use shared::events::PredictorEvent;
use tracing::info;

/// Placeholder text the indicator shows for each state.
pub fn label(state: CompletionState) -> &'static str {
    match state {
        CompletionState::Idle => "Ask something...",
        CompletionState::Observing => "Observing...",
        CompletionState::Thinking => "Thinking...",
        CompletionState::Searching => "Searching...",
        CompletionState::Ready => "Ready...",
    }
}

/// One indicator line per event, or `None` when nothing visible changes.
pub fn render(
    event: &PredictorEvent,
    prediction: Option<&str>,
    last: &mut Option<CompletionState>,
) -> Option<String> {
    match event {
        PredictorEvent::StateChanged(state) => {
            if *last == Some(*state) {
                return None;
            }
            *last = Some(*state);
            match (state, prediction) {
                (CompletionState::Ready, Some(text)) => {
                    Some(format!("{} {}", label(*state), text))
                }
                _ => Some(label(*state).to_string()),
            }
        }
        PredictorEvent::Committed(text) => Some(format!("typed: {}", text)),
    }
}

pub async fn run(predictor: Predictor, mut events: Subscription) {
    let mut last = None;
    println!("{}", label(CompletionState::Idle));
    while let Some(event) = events.recv().await {
        let prediction = predictor.prediction();
        if let Some(line) = render(&event, prediction.as_deref(), &mut last) {
            info!(event = ?event, "indicator updated");
            println!("{}", line);
        }
    }
}
