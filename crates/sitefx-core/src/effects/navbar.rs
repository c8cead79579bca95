//! Navigation state that follows the scroll position

use crate::surface::{classes, selectors, ElementId, Surface};
use crate::Result;

/// Extra distance above a section at which its link becomes active
const ACTIVE_LINK_MARGIN: f64 = 100.0;

fn navbar_height(surface: &dyn Surface, navbar: Option<ElementId>) -> f64 {
    navbar
        .and_then(|id| surface.bounding_box(id).ok())
        .map(|rect| rect.height)
        .unwrap_or(0.0)
}

/// Toggles `scrolled` on the navbar past a scroll offset
#[derive(Debug)]
pub struct NavbarScroll {
    navbar: Option<ElementId>,
    threshold: f64,
}

impl NavbarScroll {
    pub fn new(surface: &dyn Surface, threshold: f64) -> Result<Self> {
        Ok(Self {
            navbar: surface.query_one(selectors::NAVBAR)?,
            threshold,
        })
    }

    pub fn update(&self, surface: &mut dyn Surface) -> Result<bool> {
        let scrolled = surface.viewport().scroll_y > self.threshold;
        if let Some(navbar) = self.navbar.filter(|id| surface.is_attached(*id)) {
            surface.set_class(navbar, classes::SCROLLED, scrolled)?;
        }
        Ok(scrolled)
    }
}

/// Marks the nav link of the section under the scroll position
#[derive(Debug)]
pub struct ActiveLink {
    navbar: Option<ElementId>,
    links: Vec<(ElementId, String)>,
    sections: Vec<(ElementId, String)>,
}

impl ActiveLink {
    pub fn new(surface: &dyn Surface) -> Result<Self> {
        let links = surface
            .query(selectors::NAV_LINKS)?
            .into_iter()
            .map(|id| (id, surface.attribute(id, "href").unwrap_or_default()))
            .collect();
        let sections = surface
            .query(selectors::SECTIONS)?
            .into_iter()
            .filter_map(|id| surface.attribute(id, "id").map(|name| (id, name)))
            .collect();
        Ok(Self {
            navbar: surface.query_one(selectors::NAVBAR)?,
            links,
            sections,
        })
    }

    /// Id of the section containing `scroll_y`, if any
    ///
    /// When sections overlap the last one in document order wins.
    pub fn current_section(&self, surface: &dyn Surface) -> Result<Option<String>> {
        let scroll_y = surface.viewport().scroll_y;
        let offset = navbar_height(surface, self.navbar) + ACTIVE_LINK_MARGIN;
        let mut current = None;
        for (id, name) in &self.sections {
            if !surface.is_attached(*id) {
                continue;
            }
            let top = surface.offset_top(*id)?;
            let height = surface.bounding_box(*id)?.height;
            if scroll_y >= top - offset && scroll_y < top + height - offset {
                current = Some(name.clone());
            }
        }
        Ok(current)
    }

    pub fn update(&self, surface: &mut dyn Surface) -> Result<Option<String>> {
        let current = self.current_section(surface)?;
        let active_href = current.as_ref().map(|name| format!("#{}", name));
        for (id, href) in &self.links {
            if !surface.is_attached(*id) {
                continue;
            }
            let on = active_href.as_deref() == Some(href.as_str());
            surface.set_class(*id, classes::ACTIVE, on)?;
        }
        Ok(current)
    }
}

/// Scroll position that puts the element `href` points at just below the navbar
pub fn link_target(surface: &dyn Surface, href: &str) -> Result<Option<f64>> {
    if !href.starts_with('#') || href.len() < 2 {
        return Ok(None);
    }
    let Some(target) = surface.query_one(href)? else {
        return Ok(None);
    };
    let navbar = surface.query_one(selectors::NAVBAR)?;
    Ok(Some(surface.offset_top(target)? - navbar_height(surface, navbar)))
}

/// Floating button that returns to the top, shown past a scroll offset
#[derive(Debug)]
pub struct ScrollTopButton {
    button: ElementId,
    threshold: f64,
}

impl ScrollTopButton {
    pub fn install(surface: &mut dyn Surface, threshold: f64) -> Result<Self> {
        let button = surface.create("button", &[classes::SCROLL_TO_TOP]);
        surface.set_attribute(button, "aria-label", Some("Scroll to top"))?;
        Ok(Self { button, threshold })
    }

    pub fn element(&self) -> ElementId {
        self.button
    }

    pub fn update(&self, surface: &mut dyn Surface) -> Result<bool> {
        let visible = surface.viewport().scroll_y > self.threshold;
        if surface.is_attached(self.button) {
            surface.set_class(self.button, classes::VISIBLE, visible)?;
        }
        Ok(visible)
    }
}
