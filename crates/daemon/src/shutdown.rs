//! Cooperative stop signal shared between the loop thread and its owner.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// One-way stop request, observable across threads.
///
/// The flag transitions true once and never resets; a stopped token stays
/// stopped. The condition variable lets [`wait_timeout`](Self::wait_timeout)
/// end a between-cycle sleep as soon as a stop is requested instead of
/// running out the full interval.
#[derive(Clone, Debug, Default)]
pub struct ShutdownToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl ShutdownToken {
    /// Creates a token in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.inner
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests a stop. Idempotent and non-blocking; wakes any thread
    /// sleeping in [`wait_timeout`](Self::wait_timeout).
    pub fn request_stop(&self) {
        let mut stopped = self.flag();
        *stopped = true;
        self.inner.wake.notify_all();
    }

    /// Reports whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.flag()
    }

    /// Blocks for up to `timeout`, returning `true` as soon as a stop is
    /// requested and `false` when the timeout elapses without one.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut stopped = self.flag();
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = self
                .inner
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}
