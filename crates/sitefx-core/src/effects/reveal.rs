use tracing::trace;

use crate::surface::{classes, selectors, ElementId, Surface};
use crate::Result;

/// One-way `revealed` flag for elements scrolled into view
#[derive(Debug)]
pub struct ScrollReveal {
    threshold_px: f64,
    elements: Vec<ElementId>,
}

impl ScrollReveal {
    pub fn new(surface: &dyn Surface, threshold_px: f64) -> Result<Self> {
        Ok(Self {
            threshold_px,
            elements: surface.query(selectors::REVEAL)?,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Reveal every element whose top is above `viewport.height - threshold`
    ///
    /// Returns how many elements were newly revealed. Elements already
    /// revealed are skipped, so scrolling back up never hides anything.
    pub fn check(&self, surface: &mut dyn Surface) -> Result<usize> {
        let reveal_line = surface.viewport().height - self.threshold_px;
        let mut revealed = 0;
        for &id in &self.elements {
            if !surface.is_attached(id) || surface.has_class(id, classes::REVEALED) {
                continue;
            }
            if surface.bounding_box(id)?.top() < reveal_line {
                surface.set_class(id, classes::REVEALED, true)?;
                revealed += 1;
            }
        }
        if revealed > 0 {
            trace!(revealed, "Revealed elements");
        }
        Ok(revealed)
    }
}
