//! Easing curves for smooth scrolling

pub use crate::config::EasingType;

impl EasingType {
    /// Eased fraction for elapsed fraction `t`, clamped to [0, 1]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutQuad => ease_in_out_quad(t),
        }
    }
}

/// Quadratic ease-in-out over [0, 1]
///
/// Speeds up until the midpoint, then slows down by the mirrored curve.
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let rest = 1.0 - t;
        1.0 - 2.0 * rest * rest
    }
}
