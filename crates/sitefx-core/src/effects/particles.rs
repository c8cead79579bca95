//! Decorative particle backdrop behind the hero section
//!
//! A fixed pool of drifting dots that bounce off the canvas edges. The pool
//! is created once; resizing the canvas changes the bounds and only moves
//! particles that the new bounds left outside.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::surface::{selectors, Surface};
use crate::Result;

/// Velocities are expressed per frame at this refresh rate
const NOMINAL_FPS: f64 = 60.0;

/// Drawing target for the backdrop
pub trait Canvas {
    fn clear(&mut self, width: f64, height: f64);

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, opacity: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    /// Move by `frames` nominal frames, bouncing back inside on any axis that left its bound
    fn advance(&mut self, frames: f64, width: f64, height: f64) {
        self.x += self.vx * frames;
        self.y += self.vy * frames;
        bounce(&mut self.x, &mut self.vx, width);
        bounce(&mut self.y, &mut self.vy, height);
    }

    fn confine(&mut self, width: f64, height: f64) {
        bounce(&mut self.x, &mut self.vx, width);
        bounce(&mut self.y, &mut self.vy, height);
    }
}

/// Pin `pos` to `[0, bound]` and point `vel` back inward
fn bounce(pos: &mut f64, vel: &mut f64, bound: f64) {
    let bound = bound.max(0.0);
    if *pos < 0.0 {
        *pos = 0.0;
        *vel = vel.abs();
    } else if *pos > bound {
        *pos = bound;
        *vel = -vel.abs();
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    color: String,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Spawn `config.count` particles at random positions inside the canvas
    pub fn new(width: f64, height: f64, config: &ParticleConfig, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let particles = (0..config.count)
            .map(|_| Particle {
                x: sample(&mut rng, 0.0, width),
                y: sample(&mut rng, 0.0, height),
                vx: sample(&mut rng, -config.max_speed, config.max_speed),
                vy: sample(&mut rng, -config.max_speed, config.max_speed),
                radius: sample(&mut rng, config.radius_min, config.radius_max),
                opacity: sample(&mut rng, config.opacity_min, config.opacity_max),
            })
            .collect();
        Self::with_particles(width, height, &config.color, particles)
    }

    pub fn with_particles(width: f64, height: f64, color: &str, particles: Vec<Particle>) -> Self {
        Self {
            width,
            height,
            color: color.to_string(),
            particles,
        }
    }

    /// Backdrop sized to the hero container; `None` when the page has no hero
    pub fn for_hero(surface: &dyn Surface, config: &ParticleConfig, seed: Option<u64>) -> Result<Option<Self>> {
        let Some(hero) = surface.query_one(selectors::HERO)? else {
            return Ok(None);
        };
        let rect = surface.bounding_box(hero)?;
        Ok(Some(Self::new(rect.width, rect.height, config, seed)))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Change the canvas bounds; particles left outside are pulled back to the new edge
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        for particle in &mut self.particles {
            particle.confine(width, height);
        }
    }

    /// Advance by wall-clock time since the previous frame
    pub fn advance(&mut self, dt: Duration) {
        self.advance_frames(dt.as_secs_f64() * NOMINAL_FPS);
    }

    pub fn advance_frames(&mut self, frames: f64) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.advance(frames, width, height);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(self.width, self.height);
        for p in &self.particles {
            canvas.fill_circle(p.x, p.y, p.radius, &self.color, p.opacity);
        }
    }
}

fn sample(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{landing_page, MemorySurface};

    #[derive(Default)]
    struct RecordingCanvas {
        clears: usize,
        circles: Vec<(f64, f64, f64, String, f64)>,
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self, _width: f64, _height: f64) {
            self.clears += 1;
            self.circles.clear();
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, opacity: f64) {
            self.circles.push((x, y, radius, color.to_string(), opacity));
        }
    }

    fn particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle { x, y, vx, vy, radius: 2.0, opacity: 0.5 }
    }

    #[test]
    fn test_spawn_within_configured_ranges() {
        let config = ParticleConfig::default();
        let field = ParticleField::new(1280.0, 800.0, &config, Some(7));
        assert_eq!(field.len(), 50);
        for p in field.particles() {
            assert!((0.0..=1280.0).contains(&p.x));
            assert!((0.0..=800.0).contains(&p.y));
            assert!(p.vx.abs() <= config.max_speed);
            assert!(p.vy.abs() <= config.max_speed);
            assert!((1.0..=4.0).contains(&p.radius));
            assert!((0.2..=0.7).contains(&p.opacity));
        }
    }

    #[test]
    fn test_reflects_at_bounds() {
        let mut field = ParticleField::with_particles(
            100.0,
            50.0,
            "#fff",
            vec![particle(99.9, 25.0, 0.25, 0.0), particle(10.0, 0.1, 0.0, -0.25)],
        );

        field.advance_frames(1.0);
        let p = field.particles();
        assert_eq!(p[0].x, 100.0);
        assert_eq!(p[0].vx, -0.25);
        assert_eq!(p[1].y, 0.0);
        assert_eq!(p[1].vy, 0.25);

        field.advance_frames(1.0);
        let p = field.particles();
        assert!(p[0].x < 100.0);
        assert!(p[1].y > 0.0);
    }

    fn assert_inside(field: &ParticleField) {
        let (width, height) = field.bounds();
        for p in field.particles() {
            assert!((0.0..=width).contains(&p.x), "x = {}", p.x);
            assert!((0.0..=height).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn test_long_gap_between_frames_stays_inside() {
        let mut field = ParticleField::with_particles(100.0, 100.0, "#fff", vec![particle(99.0, 50.0, 0.25, 0.0)]);

        field.advance(Duration::from_secs(2));
        assert_inside(&field);
        assert!(field.particles()[0].vx < 0.0);

        for _ in 0..600 {
            field.advance(Duration::from_millis(16));
            assert_inside(&field);
        }
    }

    #[test]
    fn test_shrink_pulls_particles_inside() {
        let mut field = ParticleField::with_particles(
            100.0,
            100.0,
            "#fff",
            vec![particle(90.0, 95.0, 0.25, 0.1), particle(10.0, 10.0, -0.25, 0.0)],
        );

        field.resize(50.0, 60.0);
        assert_inside(&field);
        assert_eq!(field.particles()[0].x, 50.0);
        assert_eq!(field.particles()[0].vx, -0.25);
        assert_eq!(field.particles()[1], particle(10.0, 10.0, -0.25, 0.0));

        for _ in 0..600 {
            field.advance(Duration::from_millis(16));
            assert_inside(&field);
        }
    }

    #[test]
    fn test_pool_size_fixed_over_time() {
        let mut field = ParticleField::new(300.0, 200.0, &ParticleConfig::default(), Some(1));
        for _ in 0..10_000 {
            field.advance(Duration::from_millis(16));
        }
        assert_eq!(field.len(), 50);
        assert_inside(&field);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = ParticleField::new(300.0, 200.0, &ParticleConfig::default(), Some(3));
        let before = field.particles().to_vec();
        field.resize(600.0, 400.0);
        assert_eq!(field.bounds(), (600.0, 400.0));
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_draw_clears_then_fills_each() {
        let field = ParticleField::new(300.0, 200.0, &ParticleConfig::default(), Some(5));
        let mut canvas = RecordingCanvas::default();
        field.draw(&mut canvas);
        field.draw(&mut canvas);
        assert_eq!(canvas.clears, 2);
        assert_eq!(canvas.circles.len(), 50);
        assert!(canvas.circles.iter().all(|c| c.3 == "#d69e2e"));
    }

    #[test]
    fn test_hero_sizing() {
        let surface = landing_page(1280.0, 800.0);
        let field = ParticleField::for_hero(&surface, &ParticleConfig::default(), Some(1))
            .unwrap()
            .unwrap();
        assert_eq!(field.bounds(), (1280.0, 800.0));

        let empty = MemorySurface::new(800.0, 600.0);
        assert!(ParticleField::for_hero(&empty, &ParticleConfig::default(), None)
            .unwrap()
            .is_none());
    }
}
