//! The prediction engine: key events in, state changes and commits out.
//!
//! All mutable state sits behind one lock. Every transition is made and
//! announced while that lock is held, so observers see transitions in the
//! order they happened and a cycle's final "is my token current" check
//! cannot interleave with the activity path that invalidates it.

use parking_lot::Mutex;
use shared::collaborators::Collaborators;
use shared::completion::CompletionState;
use shared::events::PredictorEvent;
use shared::keys::KeyEvent;
use shared::settings::PredictorSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::cancel::{CancellationTokens, CycleToken};
use crate::cycle::PredictionCycle;
use crate::debounce::{Debouncer, Settle, DEFAULT_QUIET_PERIOD};
use crate::error::CycleError;
use crate::gesture::{ConfirmGesture, GestureOutcome};
use crate::history::{InputHistory, DEFAULT_HISTORY_LIMIT};
use crate::observers::{Observers, Subscription};

/// How long injected keystrokes keep being dropped after typing returns;
/// some hooks deliver them late.
pub const DEFAULT_ECHO_DRAIN: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub quiet_period: Duration,
    pub history_limit: usize,
    /// Hook name of the confirmation key, compared case-insensitively
    pub confirm_key: String,
    pub max_tokens: u32,
    pub echo_drain: Duration,
}

impl PredictorConfig {
    pub fn from_settings(settings: &PredictorSettings, max_tokens: u32) -> Self {
        Self {
            quiet_period: Duration::from_millis(settings.quiet_period_ms),
            history_limit: settings.history_limit,
            confirm_key: settings.confirm_key.clone(),
            max_tokens,
            echo_drain: DEFAULT_ECHO_DRAIN,
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            history_limit: DEFAULT_HISTORY_LIMIT,
            confirm_key: "LEFT ALT".to_string(),
            max_tokens: 4096,
            echo_drain: DEFAULT_ECHO_DRAIN,
        }
    }
}

struct Core {
    state: CompletionState,
    history: InputHistory,
    gesture: ConfirmGesture,
    prediction: Option<String>,
    /// Injected keystrokes are echoed back by the hook; drop them
    injecting: bool,
    cycles_started: u64,
}

struct Shared {
    config: PredictorConfig,
    collaborators: Collaborators,
    handle: Handle,
    core: Mutex<Core>,
    tokens: CancellationTokens,
    debouncer: Debouncer,
    observers: Arc<Observers>,
}

/// Handle to the engine. Cheap to clone; all clones drive the same state.
#[derive(Clone)]
pub struct Predictor {
    shared: Arc<Shared>,
}

impl Predictor {
    /// Must be called from within a tokio runtime; later calls to
    /// `handle_key` may come from any thread.
    pub fn new(config: PredictorConfig, collaborators: Collaborators) -> Self {
        let handle = Handle::current();
        let core = Core {
            state: CompletionState::Idle,
            history: InputHistory::with_limit(config.history_limit),
            gesture: ConfirmGesture::new(),
            prediction: None,
            injecting: false,
            cycles_started: 0,
        };
        Self {
            shared: Arc::new(Shared {
                debouncer: Debouncer::new(handle.clone(), config.quiet_period),
                config,
                collaborators,
                handle,
                core: Mutex::new(core),
                tokens: CancellationTokens::new(),
                observers: Arc::new(Observers::default()),
            }),
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.shared.config
    }

    pub fn subscribe(&self) -> Subscription {
        self.shared.observers.subscribe()
    }

    pub fn state(&self) -> CompletionState {
        self.shared.core.lock().state
    }

    /// The prediction waiting for confirmation, if any
    pub fn prediction(&self) -> Option<String> {
        self.shared.core.lock().prediction.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.shared.core.lock().history.snapshot()
    }

    pub fn cycles_started(&self) -> u64 {
        self.shared.core.lock().cycles_started
    }

    pub fn is_armed(&self) -> bool {
        self.shared.core.lock().gesture.is_armed()
    }

    /// Feed one event from the keyboard hook.
    pub fn handle_key(&self, event: KeyEvent) {
        if !event.is_down() {
            return;
        }
        let shared = &self.shared;
        let mut core = shared.core.lock();
        if core.injecting {
            return;
        }

        let is_confirm = event.name.eq_ignore_ascii_case(&shared.config.confirm_key);
        if !is_confirm {
            core.history.record(&event);
            if event.is_content() {
                shared.on_activity(&mut core);
            }
        }

        let ready = core.state == CompletionState::Ready;
        match core.gesture.on_key_down(is_confirm, ready) {
            GestureOutcome::Commit => shared.commit(&mut core),
            GestureOutcome::Armed => debug!("confirmation armed"),
            GestureOutcome::Ignored => {}
        }
    }

    /// Stop the timer and supersede any in-flight cycle.
    pub fn shutdown(&self) {
        let _core = self.shared.core.lock();
        self.shared.debouncer.cancel();
        self.shared.tokens.invalidate();
    }
}

impl Shared {
    fn set_state(&self, core: &mut Core, state: CompletionState) {
        if core.state != state {
            debug!(from = %core.state, to = %state, "state changed");
        }
        core.state = state;
        self.observers.emit(PredictorEvent::StateChanged(state));
    }

    fn on_activity(self: &Arc<Self>, core: &mut Core) {
        self.tokens.invalidate();
        if core.state == CompletionState::Ready {
            core.prediction = None;
            core.gesture.disarm();
            self.set_state(core, CompletionState::Idle);
        }

        let weak = Arc::downgrade(self);
        self.debouncer.restart(move |settle| {
            if let Some(shared) = weak.upgrade() {
                shared.on_settle(settle);
            }
        });
        self.set_state(core, CompletionState::Observing);
    }

    fn on_settle(self: Arc<Self>, settle: Settle) {
        let mut core = self.core.lock();
        if !self.debouncer.is_current(settle) {
            return;
        }

        let token = self.tokens.mint();
        core.cycles_started += 1;
        let cycle = PredictionCycle::new(token, core.history.to_json(), self.config.max_tokens);
        debug!(cycle = cycle.id(), keys = core.history.len(), "user settled, starting cycle");
        self.set_state(&mut core, CompletionState::Thinking);
        drop(core);

        let handle = self.handle.clone();
        handle.spawn(self.drive(cycle));
    }

    async fn drive(self: Arc<Self>, mut cycle: PredictionCycle) {
        let result = cycle
            .run(&self.collaborators, |token| self.enter_searching(token))
            .await;

        let mut core = self.core.lock();
        let current = cycle.token().is_current();
        match result {
            Ok(text) if current => {
                info!(cycle = cycle.id(), chars = text.chars().count(), "prediction ready");
                core.prediction = Some(text);
                core.gesture.disarm();
                self.set_state(&mut core, CompletionState::Ready);
            }
            Ok(_) => debug!(cycle = cycle.id(), "discarding prediction of superseded cycle"),
            Err(e) if e.is_cancellation() => debug!(cycle = cycle.id(), "cycle superseded"),
            Err(e) if current => {
                warn!(cycle = cycle.id(), error = %e, "prediction cycle failed");
                self.set_state(&mut core, CompletionState::Idle);
            }
            Err(e) => debug!(cycle = cycle.id(), error = %e, "superseded cycle failed"),
        }
    }

    fn enter_searching(&self, token: &CycleToken) -> Result<(), CycleError> {
        let mut core = self.core.lock();
        token.checkpoint()?;
        self.set_state(&mut core, CompletionState::Searching);
        Ok(())
    }

    /// Announce the commit and type the prediction off the caller's thread,
    /// so the hook keeps draining (and dropping) the echo meanwhile. Echoes
    /// stay suppressed for `echo_drain` after typing returns.
    fn commit(self: &Arc<Self>, core: &mut Core) {
        let Some(text) = core.prediction.take() else {
            self.set_state(core, CompletionState::Idle);
            return;
        };
        info!(chars = text.chars().count(), "committing prediction");
        self.observers.emit(PredictorEvent::Committed(text.clone()));
        core.injecting = true;

        let shared = Arc::clone(self);
        self.handle.spawn_blocking(move || {
            if let Err(e) = shared.collaborators.injector.type_text(&text) {
                warn!(error = %e, "text injection failed");
            }
            let drain = shared.config.echo_drain;
            let handle = shared.handle.clone();
            handle.spawn(async move {
                tokio::time::sleep(drain).await;
                shared.finish_injection();
            });
        });
    }

    fn finish_injection(&self) {
        let mut core = self.core.lock();
        core.injecting = false;
        core.gesture.disarm();
        self.set_state(&mut core, CompletionState::Idle);
    }
}
