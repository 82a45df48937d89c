//! Request throttling: an admission gate that bounds calls to the file
//! server to at most `max_requests` per rolling `window`.
//!
//! The throttler never rejects work, it only delays it. One instance is
//! shared by every scanner and downloader of a cluster, so the budget is
//! enforced cluster-wide rather than per business unit.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Requests admitted per window when the caller does not override it.
pub const DEFAULT_MAX_REQUESTS: usize = 2;
/// Rolling window length when the caller does not override it.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

/// Rolling-window rate limiter for file server calls.
///
/// Admission timestamps are kept in a FIFO record guarded by a mutex. The
/// lock covers only that bookkeeping: the computed wait and the wrapped
/// operation itself run outside it, so concurrent callers are never
/// serialised beyond the admission decision.
pub struct RequestThrottler {
    max_requests: usize,
    window: Duration,
    admissions: Mutex<VecDeque<Instant>>,
}

impl RequestThrottler {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        assert!(max_requests > 0, "max_requests must be at least 1");
        Self {
            max_requests,
            window,
            admissions: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Run one remote call under the admission budget, propagating whatever
    /// the operation returns.
    pub async fn run<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let wait = self.reserve(Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        operation().await
    }

    /// Book an admission slot and return how long the caller must wait
    /// before using it.
    ///
    /// The new admission is recorded at `now + wait`, not `now`, so callers
    /// that queue up behind a full window see a consistent schedule even
    /// before earlier sleeps complete.
    fn reserve(&self, now: Instant) -> Duration {
        let mut admissions = self
            .admissions
            .lock()
            .expect("throttler bookkeeping is never poisoned");

        while admissions
            .front()
            .is_some_and(|&stamp| stamp + self.window <= now)
        {
            admissions.pop_front();
        }

        let mut wait = Duration::ZERO;
        if admissions.len() >= self.max_requests {
            let oldest = admissions
                .pop_front()
                .expect("record is non-empty at capacity");
            wait = (oldest + self.window).saturating_duration_since(now);
        }
        admissions.push_back(now + wait);
        wait
    }
}
