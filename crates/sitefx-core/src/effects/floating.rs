//! Drifting decorations layered over the hero
//!
//! A one-time setup pass: a `.floating-elements` layer sized to the hero gets
//! six `.floating-element` children at random spots, each with its own drift
//! delay and duration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::{selectors, Surface};
use crate::Result;

pub const FLOATING_COUNT: usize = 6;

pub const LAYER_CLASS: &str = "floating-elements";
pub const ELEMENT_CLASS: &str = "floating-element";

/// Add the floating layer to the hero; returns how many elements were placed
pub fn create_floating_elements(surface: &mut dyn Surface, seed: Option<u64>) -> Result<usize> {
    let Some(hero) = surface.query_one(selectors::HERO)? else {
        return Ok(0);
    };
    let rect = surface.bounding_box(hero)?;
    let top = surface.offset_top(hero)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Surface elements are flat, so the layer is pinned over the hero box
    let layer = surface.create("div", &[LAYER_CLASS]);
    surface.set_style(layer, "top", &format!("{top}px"))?;
    surface.set_style(layer, "left", &format!("{}px", rect.x))?;
    surface.set_style(layer, "width", &format!("{}px", rect.width))?;
    surface.set_style(layer, "height", &format!("{}px", rect.height))?;

    for _ in 0..FLOATING_COUNT {
        let element = surface.create("div", &[ELEMENT_CLASS]);
        surface.set_attribute(element, "data-layer", Some(LAYER_CLASS))?;
        surface.set_style(element, "left", &format!("{:.2}%", rng.random_range(0.0..100.0)))?;
        surface.set_style(element, "top", &format!("{:.2}%", rng.random_range(0.0..100.0)))?;
        surface.set_style(element, "animation-delay", &format!("{:.2}s", rng.random_range(0.0..6.0)))?;
        surface.set_style(element, "animation-duration", &format!("{:.2}s", rng.random_range(4.0..8.0)))?;
    }
    Ok(FLOATING_COUNT)
}
