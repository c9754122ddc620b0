//! Ordered, synchronous fan-out of predictor events.

use parking_lot::Mutex;
use shared::events::PredictorEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

#[derive(Default)]
pub(crate) struct Observers {
    next_id: AtomicU64,
    sinks: Mutex<Vec<(u64, mpsc::UnboundedSender<PredictorEvent>)>>,
}

impl Observers {
    pub(crate) fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.sinks.lock().push((id, tx));
        Subscription {
            id,
            rx,
            observers: Arc::downgrade(self),
        }
    }

    /// Deliver to every live subscriber before returning.
    pub(crate) fn emit(&self, event: PredictorEvent) {
        self.sinks
            .lock()
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    fn remove(&self, id: u64) {
        self.sinks.lock().retain(|(sink_id, _)| *sink_id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.sinks.lock().len()
    }
}

/// Receiving end of a subscription. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<PredictorEvent>,
    observers: Weak<Observers>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<PredictorEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<PredictorEvent> {
        self.rx.try_recv().ok()
    }

    /// Everything delivered so far, without waiting.
    pub fn drain(&mut self) -> Vec<PredictorEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.remove(self.id);
        }
    }
}
