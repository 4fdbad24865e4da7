//! Bounded-concurrency task execution.
//!
//! The limiter caps how many asset files are processed at once: up to
//! `limit` tasks run concurrently, the rest wait in FIFO admission order.
//! A task's failure is its caller's problem alone — it never halts other
//! queued or active tasks. [`ConcurrencyLimiter::on_idle`] lets the batch
//! driver wait until every submitted task has settled before finalizing the
//! output streams; it is driven by a completion notification, not polling.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, Semaphore};

/// Snapshot of limiter occupancy, used in debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStats {
    /// Tasks currently executing.
    pub active: usize,
    /// Tasks submitted but waiting for a slot.
    pub queued: usize,
    pub limit: usize,
}

/// Limits the number of concurrently executing tasks.
pub struct ConcurrencyLimiter {
    limit: usize,
    // Tokio's semaphore is FIFO-fair, which gives waiting tasks admission
    // in submission order.
    slots: Semaphore,
    /// Submitted tasks that have not yet settled (waiting or executing).
    in_flight: AtomicUsize,
    idle: Notify,
}

impl ConcurrencyLimiter {
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            limit: limit.get(),
            slots: Semaphore::new(limit.get()),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    /// Execute `task` under the concurrency bound.
    ///
    /// The task starts as soon as a slot is free, in FIFO order behind any
    /// earlier waiters. Its output (including an `Err`) is returned to this
    /// caller only.
    pub async fn run<T>(&self, task: impl Future<Output = T>) -> T {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        // Settles the task even if this future is dropped mid-wait.
        let _settled = SettleGuard { limiter: self };

        let _permit = self
            .slots
            .acquire()
            .await
            .expect("limiter semaphore is never closed");

        tracing::debug!(stats = ?self.stats(), "starting task");
        task.await
    }

    /// Resolve once every submitted task has settled.
    ///
    /// Returns immediately if nothing is in flight.
    pub async fn on_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn stats(&self) -> LimiterStats {
        let active = self.limit - self.slots.available_permits();
        let in_flight = self.in_flight.load(Ordering::SeqCst);
        LimiterStats {
            active,
            queued: in_flight.saturating_sub(active),
            limit: self.limit,
        }
    }
}

struct SettleGuard<'a> {
    limiter: &'a ConcurrencyLimiter,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if self.limiter.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.limiter.idle.notify_waiters();
        }
    }
}
