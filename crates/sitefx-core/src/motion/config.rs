//! Scroll timing derived from the `[scroll]` config section

use std::time::Duration;

pub use crate::config::{EasingType, ScrollConfig};

/// Refresh rate used when the configured one is zero
const FALLBACK_FPS: u32 = 60;

/// Shortest frame period the refresh loop will be asked to keep
pub const MIN_FRAME_PERIOD: Duration = Duration::from_millis(1);

impl ScrollConfig {
    /// How long a nav or scroll-to-top jump takes
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Period between display refreshes, never shorter than [`MIN_FRAME_PERIOD`]
    pub fn frame_duration(&self) -> Duration {
        let fps = match self.animation_fps {
            0 => FALLBACK_FPS,
            fps => fps,
        };
        Duration::from_millis(1000 / u64::from(fps)).max(MIN_FRAME_PERIOD)
    }

    /// Jumps animate only when enabled and given a non-zero duration
    pub fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}
