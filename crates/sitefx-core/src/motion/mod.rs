//! Motion primitives for the page engine
//!
//! # Layers
//!
//! ## Atomic
//! - `config` - Scroll configuration accessors
//! - `easing` - Linear and ease-in-out quadratic curves
//! - `timing` - Elapsed-fraction and interpolation helpers
//!
//! ## Molecular
//! - `smooth_scroll` - Frame-sampled window scroll animation
//!
//! # Usage
//!
//! ```ignore
//! use sitefx_core::motion::SmoothScroll;
//!
//! let mut scroll = SmoothScroll::new(config.scroll.clone());
//! scroll.scroll_to(surface.viewport().scroll_y, 1200.0);
//!
//! // On every display refresh
//! if let Some(y) = scroll.sample(now) {
//!     surface.scroll_to(y);
//! }
//! ```

// Atomic layer
pub mod config;
pub mod easing;
pub mod timing;

// Molecular layer
pub mod smooth_scroll;

pub use config::ScrollConfig;
pub use easing::EasingType;
pub use smooth_scroll::SmoothScroll;
