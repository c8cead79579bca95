//! Throttle and debounce over the timer queue
//!
//! Both run the wrapped task on the trailing edge. A throttle coalesces
//! every call inside one window into a single run `wait` after the first
//! call; a debounce restarts its window on every call and only runs once
//! calls go quiet.

use std::time::Duration;

use super::queue::{TimerId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    Throttle,
    Debounce,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    mode: RateLimit,
    wait: Duration,
    pending: Option<TimerId>,
}

impl RateLimiter {
    pub fn throttle(wait: Duration) -> Self {
        Self { mode: RateLimit::Throttle, wait, pending: None }
    }

    pub fn debounce(wait: Duration) -> Self {
        Self { mode: RateLimit::Debounce, wait, pending: None }
    }

    pub fn mode(&self) -> RateLimit {
        self.mode
    }

    /// Request a run of `task`; returns the timer that will carry it
    pub fn call<T: Clone>(&mut self, queue: &mut TimerQueue<T>, task: T) -> TimerId {
        if let Some(id) = self.pending.filter(|id| queue.is_active(*id)) {
            match self.mode {
                RateLimit::Throttle => return id,
                RateLimit::Debounce => {
                    queue.cancel(id);
                }
            }
        }
        let id = queue.set_timeout(self.wait, task);
        self.pending = Some(id);
        id
    }

    /// Whether a trailing run is still scheduled
    pub fn is_pending<T: Clone>(&self, queue: &TimerQueue<T>) -> bool {
        self.pending.is_some_and(|id| queue.is_active(id))
    }

    pub fn cancel<T: Clone>(&mut self, queue: &mut TimerQueue<T>) {
        if let Some(id) = self.pending.take() {
            queue.cancel(id);
        }
    }
}
