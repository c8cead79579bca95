//! Cooperative scheduling: the event queue and rate limiters built on it

mod queue;
mod rate_limit;

pub use queue::{TimerId, TimerKind, TimerQueue};
pub use rate_limit::{RateLimit, RateLimiter};
