use crate::surface::{selectors, ElementId, Surface};
use crate::Result;

/// Vertical offset for a layer moving at `speed` relative to the scroll
#[inline]
pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    -(scroll_y * speed)
}

/// Parse a `data-speed` value, falling back to `default` when missing or invalid
pub fn speed_factor(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|speed| speed.is_finite())
        .unwrap_or(default)
}

/// Translates `.parallax-element` layers against the scroll position
#[derive(Debug)]
pub struct Parallax {
    layers: Vec<(ElementId, f64)>,
}

impl Parallax {
    pub fn new(surface: &dyn Surface, default_speed: f64) -> Result<Self> {
        let layers = surface
            .query(selectors::PARALLAX)?
            .into_iter()
            .map(|id| {
                let speed = speed_factor(surface.attribute(id, "data-speed").as_deref(), default_speed);
                (id, speed)
            })
            .collect();
        Ok(Self { layers })
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn speeds(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers.iter().map(|(_, speed)| *speed)
    }

    /// Apply the transform for the current scroll position to every layer
    pub fn update(&self, surface: &mut dyn Surface) -> Result<()> {
        let scroll_y = surface.viewport().scroll_y;
        for &(id, speed) in &self.layers {
            if !surface.is_attached(id) {
                continue;
            }
            let offset = parallax_offset(scroll_y, speed);
            surface.set_style(id, "transform", &format!("translateY({}px)", offset))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{landing_page, MemorySurface};

    #[test]
    fn test_offset_is_pure_and_sign_reverses() {
        assert_eq!(parallax_offset(0.0, 0.5), 0.0);
        assert_eq!(parallax_offset(200.0, 0.5), -100.0);
        assert_eq!(parallax_offset(200.0, -0.5), 100.0);
        assert_eq!(parallax_offset(200.0, 0.5), parallax_offset(200.0, 0.5));
        assert_eq!(parallax_offset(-200.0, 0.5), -parallax_offset(200.0, 0.5));
    }

    #[test]
    fn test_speed_factor_fallbacks() {
        assert_eq!(speed_factor(Some("0.3"), 0.5), 0.3);
        assert_eq!(speed_factor(Some(" 1.2 "), 0.5), 1.2);
        assert_eq!(speed_factor(Some("0"), 0.5), 0.0);
        assert_eq!(speed_factor(None, 0.5), 0.5);
        assert_eq!(speed_factor(Some("fast"), 0.5), 0.5);
        assert_eq!(speed_factor(Some("NaN"), 0.5), 0.5);
        assert_eq!(speed_factor(Some("inf"), 0.5), 0.5);
    }

    #[test]
    fn test_update_applies_transform() {
        let mut surface = landing_page(1280.0, 800.0);
        let parallax = Parallax::new(&surface, 0.5).unwrap();
        assert_eq!(parallax.speeds().collect::<Vec<_>>(), vec![0.3, 0.6, 0.5]);

        surface.scroll_to(100.0);
        parallax.update(&mut surface).unwrap();
        let layers = surface.query(selectors::PARALLAX).unwrap();
        assert_eq!(surface.style(layers[0], "transform").as_deref(), Some("translateY(-30px)"));
        assert_eq!(surface.style(layers[2], "transform").as_deref(), Some("translateY(-50px)"));
    }

    #[test]
    fn test_no_layers_is_noop() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let parallax = Parallax::new(&surface, 0.5).unwrap();
        assert!(parallax.is_empty());
        parallax.update(&mut surface).unwrap();
    }
}
