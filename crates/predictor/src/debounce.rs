//! Restartable delayed callback used as the idle detector.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Default quiet period before the user counts as settled
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Proof that a scheduled delay elapsed, tagged with its epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    epoch: u64,
}

pub struct Debouncer {
    handle: Handle,
    delay: Duration,
    epoch: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(handle: Handle, delay: Duration) -> Self {
        Self {
            handle,
            delay,
            epoch: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    /// Drop any pending callback and schedule `on_settle` after the delay.
    pub fn restart<F>(&self, on_settle: F)
    where
        F: FnOnce(Settle) + Send + 'static,
    {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delay;
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            on_settle(Settle { epoch });
        });
        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    /// False when a restart or cancel happened after this settle was scheduled.
    ///
    /// Abort only lands at the next await, so a callback that already woke
    /// up can still run; the owner checks this under its own lock.
    pub fn is_current(&self, settle: Settle) -> bool {
        self.epoch.load(Ordering::SeqCst) == settle.epoch
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::time::sleep;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let read = {
            let count = Arc::clone(&count);
            move || count.load(Ordering::SeqCst)
        };
        (count, read)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_quiet_period() {
        let debouncer = Debouncer::new(Handle::current(), DEFAULT_QUIET_PERIOD);
        let (count, fired) = counter();

        debouncer.restart(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(999)).await;
        assert_eq!(fired(), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired(), 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(fired(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_coalesces() {
        let debouncer = Debouncer::new(Handle::current(), DEFAULT_QUIET_PERIOD);
        let (count, fired) = counter();

        // 5 seconds of typing, one key every 200ms
        for _ in 0..25 {
            let count = Arc::clone(&count);
            debouncer.restart(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(fired(), 0);

        sleep(Duration::from_millis(900)).await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let debouncer = Debouncer::new(Handle::current(), DEFAULT_QUIET_PERIOD);
        let (count, fired) = counter();

        debouncer.restart(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        sleep(Duration::from_secs(2)).await;
        assert_eq!(fired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_goes_stale_on_restart() {
        let debouncer = Arc::new(Debouncer::new(Handle::current(), Duration::from_millis(10)));
        let seen = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&seen);
        debouncer.restart(move |settle| {
            *slot.lock() = Some(settle);
        });
        sleep(Duration::from_millis(20)).await;

        let settle = seen.lock().take().unwrap();
        assert!(debouncer.is_current(settle));

        debouncer.restart(|_| {});
        assert!(!debouncer.is_current(settle));
    }
}
