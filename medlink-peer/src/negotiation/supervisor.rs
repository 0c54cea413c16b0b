use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Tracks every timer-driven task of one negotiation session and cancels
/// them together.
///
/// Cancellation is cooperative: tasks watch the flag and stop at their
/// next scheduling point. A request already in flight when the flag
/// flips is allowed to finish, but its result must be discarded — tasks
/// re-check the flag after each await.
#[derive(Clone)]
pub struct PollSupervisor {
    inner: Arc<SupervisorInner>,
}

struct SupervisorInner {
    cancel_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PollSupervisor {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(SupervisorInner {
                cancel_tx,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        if let Ok(mut tasks) = self.inner.tasks.lock() {
            tasks.push(handle);
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.cancel_tx.subscribe()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancel_tx.borrow()
    }

    /// Idempotent. Tasks observe the flag at their next tick.
    pub fn cancel_all(&self) {
        self.inner.cancel_tx.send_replace(true);
    }
}

impl Default for PollSupervisor {
    fn default() -> Self {
        Self::new()
    }
}
