//! Molecular layer: frame-sampled smooth window scrolling
//!
//! Combines easing and timing to move the window to a target offset.
//! The first frame sample after `scroll_to` fixes the start time, so the
//! animation begins on the next display refresh rather than when requested.

use std::time::Duration;

use super::config::ScrollConfig;
use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Frame time of the first sample
    start: Option<Duration>,
    /// Starting scroll position
    from: f64,
    /// Target scroll position
    to: f64,
    /// Animation duration
    duration: Duration,
    /// Easing function
    easing: EasingType,
}

/// Window scroll animator
///
/// Call `scroll_to()` to begin an animation, then `sample()` on every
/// display refresh to get the position to apply.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroll {
    /// Current active animation (if any)
    animation: Option<ActiveAnimation>,
    /// Configuration
    config: ScrollConfig,
}

impl SmoothScroll {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final position of the running animation
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Start animating from `from` to `target` over the configured duration
    ///
    /// Replaces any running animation. Returns `Some(target)` when smooth
    /// scrolling is disabled and the caller should jump immediately.
    pub fn scroll_to(&mut self, from: f64, target: f64) -> Option<f64> {
        let duration = self.config.animation_duration();
        self.scroll_to_over(from, target, duration)
    }

    /// Start animating over an explicit duration
    pub fn scroll_to_over(&mut self, from: f64, target: f64, duration: Duration) -> Option<f64> {
        if !self.config.smooth_enabled || duration.is_zero() {
            self.animation = None;
            return Some(target);
        }

        self.animation = Some(ActiveAnimation {
            start: None,
            from,
            to: target,
            duration,
            easing: self.config.easing,
        });
        None
    }

    /// Advance to frame time `now` and return the position to apply
    ///
    /// Returns `None` when idle. The final sample lands exactly on the target
    /// and ends the animation.
    pub fn sample(&mut self, now: Duration) -> Option<f64> {
        let anim = self.animation.as_mut()?;
        let start = *anim.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);

        if is_complete(elapsed, anim.duration) {
            let to = anim.to;
            self.animation = None;
            return Some(to);
        }

        let t = progress(elapsed, anim.duration);
        Some(lerp(anim.from, anim.to, anim.easing.apply(t)))
    }

    /// Cancel any active animation and stop at the current position
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
