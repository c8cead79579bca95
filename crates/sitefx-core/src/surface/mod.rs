//! Rendering surface capability interface
//!
//! Every effect in the engine reads and mutates the page through [`Surface`]:
//! element lookup, class flags, inline styles, text, geometry and scroll.
//! [`MemorySurface`] is a complete in-memory implementation used by the
//! terminal preview, the headless simulator and tests.

mod layout;
mod memory;
mod selector;

pub use layout::landing_page;
pub use memory::{ElementSpec, MemorySurface};
pub use selector::{Selector, SelectorList};

use std::fmt;

use crate::Result;

/// Stable handle to an element on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned box in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

impl Viewport {
    /// Fraction of `rect` (viewport-relative) that lies inside the viewport vertically
    pub fn visible_ratio(&self, rect: &Rect) -> f64 {
        if rect.height <= 0.0 {
            return if rect.top() >= 0.0 && rect.top() <= self.height { 1.0 } else { 0.0 };
        }
        let top = rect.top().max(0.0);
        let bottom = rect.bottom().min(self.height);
        ((bottom - top) / rect.height).clamp(0.0, 1.0)
    }
}

/// Selectors the engine looks for
pub mod selectors {
    pub const LOADER: &str = "#welcome-loader";
    pub const PROGRESS_FILL: &str = "#progress-fill";
    pub const PROGRESS_PERCENTAGE: &str = "#progress-percentage";
    pub const PROGRESS_INDICATOR: &str = ".progress-truck";
    pub const HIGHLIGHT_ITEMS: &str = ".highlight-item";
    pub const STATUS_LABEL: &str = ".progress-label";
    pub const MAIN_CONTENT: &str = "#main-content";
    pub const NAVBAR: &str = "#navbar";
    pub const NAV_LINKS: &str = ".nav-link";
    pub const SECTIONS: &str = "section[id]";
    pub const HERO: &str = ".hero";
    pub const REVEAL: &str = ".reveal, .reveal-left, .reveal-right, .reveal-zoom";
    pub const PARALLAX: &str = ".parallax-element";
    pub const COUNTERS: &str = ".stat-number";
    pub const CONTACT_FORM: &str = "#contact-form";
    pub const FIELD_NAME: &str = "[name=name]";
    pub const FIELD_EMAIL: &str = "[name=email]";
    pub const FIELD_MESSAGE: &str = "[name=message]";
    pub const SUBMIT_BUTTON: &str = "button[type=submit]";
}

/// Class flags toggled by the engine
pub mod classes {
    pub const ACTIVE: &str = "active";
    pub const REVEALED: &str = "revealed";
    pub const FADE_OUT: &str = "fade-out";
    pub const SCROLLED: &str = "scrolled";
    pub const VISIBLE: &str = "visible";
    pub const FADE_IN_UP: &str = "fade-in-up";
    pub const SCROLL_TO_TOP: &str = "scroll-to-top";
}

/// Minimal capability interface over a rendered page
///
/// Lookups of detached or unknown elements fail with
/// [`Error::ElementNotFound`](crate::Error::ElementNotFound); queries never
/// return detached elements.
pub trait Surface {
    /// All attached elements matching a selector list, in document order
    fn query(&self, selector: &str) -> Result<Vec<ElementId>>;

    fn query_one(&self, selector: &str) -> Result<Option<ElementId>> {
        Ok(self.query(selector)?.into_iter().next())
    }

    fn set_class(&mut self, id: ElementId, class: &str, on: bool) -> Result<()>;

    fn has_class(&self, id: ElementId, class: &str) -> bool;

    fn set_style(&mut self, id: ElementId, property: &str, value: &str) -> Result<()>;

    fn style(&self, id: ElementId, property: &str) -> Option<String>;

    fn attribute(&self, id: ElementId, name: &str) -> Option<String>;

    /// Set or clear (`None`) an attribute
    fn set_attribute(&mut self, id: ElementId, name: &str, value: Option<&str>) -> Result<()>;

    fn text(&self, id: ElementId) -> Result<String>;

    fn set_text(&mut self, id: ElementId, text: &str) -> Result<()>;

    /// Current value of a form control
    fn value(&self, id: ElementId) -> Result<String>;

    fn set_value(&mut self, id: ElementId, value: &str) -> Result<()>;

    /// Box relative to the viewport's top-left corner
    fn bounding_box(&self, id: ElementId) -> Result<Rect>;

    /// Distance from the document top
    fn offset_top(&self, id: ElementId) -> Result<f64> {
        Ok(self.bounding_box(id)?.top() + self.viewport().scroll_y)
    }

    fn viewport(&self) -> Viewport;

    /// Scroll the window; implementations clamp to the scrollable range
    fn scroll_to(&mut self, y: f64);

    /// Append a new element to the document body
    fn create(&mut self, tag: &str, classes: &[&str]) -> ElementId;

    /// Detach an element permanently
    fn remove(&mut self, id: ElementId) -> Result<()>;

    fn is_attached(&self, id: ElementId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_ratio() {
        let viewport = Viewport { width: 800.0, height: 600.0, scroll_y: 0.0 };
        assert_eq!(viewport.visible_ratio(&Rect::new(0.0, 100.0, 10.0, 100.0)), 1.0);
        assert!((viewport.visible_ratio(&Rect::new(0.0, 550.0, 10.0, 100.0)) - 0.5).abs() < 1e-9);
        assert_eq!(viewport.visible_ratio(&Rect::new(0.0, 700.0, 10.0, 100.0)), 0.0);
        assert!((viewport.visible_ratio(&Rect::new(0.0, -30.0, 10.0, 100.0)) - 0.7).abs() < 1e-9);
    }
}
