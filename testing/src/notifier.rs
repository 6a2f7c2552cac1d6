use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use ticketing_core::Confirmation;
use ticketing_core::providers::{Notifier, NotifyError, NotifyFuture};
use tokio::sync::Notify;

/// How a [`MockNotifier`] responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierBehavior {
    /// Record the confirmation and succeed
    Succeed,
    /// Fail every delivery
    Fail,
    /// Sleep, then record and succeed
    Delay(Duration),
}

/// Mock notifier.
///
/// Records delivered confirmations and counts completed calls so tests can
/// wait for the detached delivery task.
#[derive(Debug, Clone)]
pub struct MockNotifier {
    behavior: NotifierBehavior,
    deliveries: Arc<Mutex<Vec<Confirmation>>>,
    calls: Arc<AtomicUsize>,
    completed: Arc<Notify>,
}

impl MockNotifier {
    /// Create a mock notifier with the given behavior
    #[must_use]
    pub fn new(behavior: NotifierBehavior) -> Self {
        Self {
            behavior,
            deliveries: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(Notify::new()),
        }
    }

    /// Confirmations delivered so far
    #[must_use]
    pub fn deliveries(&self) -> Vec<Confirmation> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls that have finished, successfully or not
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` calls have finished or `timeout` elapses.
    ///
    /// Returns whether `n` calls finished in time.
    pub async fn wait_for_calls(&self, n: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.completed.notified();
            if self.calls() >= n {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.calls() >= n;
            }
        }
    }

    fn finish(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.completed.notify_waiters();
    }

    fn record(&self, confirmation: Confirmation) {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(confirmation);
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new(NotifierBehavior::Succeed)
    }
}

impl Notifier for MockNotifier {
    fn send_confirmation(&self, confirmation: Confirmation) -> NotifyFuture<'_> {
        Box::pin(async move {
            let result = match self.behavior {
                NotifierBehavior::Succeed => {
                    self.record(confirmation);
                    Ok(())
                }
                NotifierBehavior::Fail => {
                    Err(NotifyError::Delivery("mock notifier failure".to_string()))
                }
                NotifierBehavior::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    self.record(confirmation);
                    Ok(())
                }
            };
            self.finish();
            result
        })
    }
}
