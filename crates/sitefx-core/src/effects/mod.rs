//! Scroll-driven and ambient page effects
//!
//! Reveal, parallax, navbar state and counters react to the scroll position;
//! the particle backdrop runs off the display refresh; card stagger is a
//! one-time setup pass.

pub mod counter;
pub mod floating;
pub mod navbar;
pub mod parallax;
pub mod particles;
pub mod reveal;
pub mod stagger;

pub use counter::{CounterAnimator, CounterState, CounterStep};
pub use floating::create_floating_elements;
pub use navbar::{link_target, ActiveLink, NavbarScroll, ScrollTopButton};
pub use parallax::{parallax_offset, speed_factor, Parallax};
pub use particles::{Canvas, Particle, ParticleField};
pub use reveal::ScrollReveal;
pub use stagger::{stagger, stagger_cards};
