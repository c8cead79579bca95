use ratatui::{
    layout::Rect,
    style::Color,
    widgets::canvas::{Canvas as CanvasWidget, Circle},
    Frame,
};
use sitefx_core::effects::Canvas;

use crate::theme::{blend, parse_hex, Theme};

/// A circle recorded from the particle field, in page pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
}

/// Collects the backdrop's draw calls so ratatui can paint them
#[derive(Debug, Default)]
pub struct ParticleLayer {
    width: f64,
    height: f64,
    background: Option<Color>,
    dots: Vec<Dot>,
}

impl ParticleLayer {
    pub fn new(background: Color) -> Self {
        Self {
            background: Some(background),
            ..Self::default()
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

impl Canvas for ParticleLayer {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.dots.clear();
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, opacity: f64) {
        let base = parse_hex(color).unwrap_or(Color::Yellow);
        let color = match self.background {
            Some(background) => blend(base, background, opacity),
            None => base,
        };
        self.dots.push(Dot { x, y, radius, color });
    }
}

pub struct ParticlesWidget;

impl ParticlesWidget {
    /// Paint the part of the backdrop between page offsets `top` and `bottom`
    pub fn render(frame: &mut Frame, area: Rect, layer: &ParticleLayer, top: f64, bottom: f64, theme: &Theme) {
        if area.height == 0 || bottom <= top {
            return;
        }
        let (width, _) = layer.bounds();
        let visible: Vec<Dot> = layer
            .dots()
            .iter()
            .filter(|d| d.y >= top && d.y <= bottom)
            .copied()
            .collect();

        // Canvas y grows upward
        let canvas = CanvasWidget::default()
            .background_color(theme.bg0)
            .x_bounds([0.0, width.max(1.0)])
            .y_bounds([0.0, bottom - top])
            .paint(move |ctx| {
                for dot in &visible {
                    ctx.draw(&Circle {
                        x: dot.x,
                        y: bottom - dot.y,
                        radius: dot.radius,
                        color: dot.color,
                    });
                }
            });
        frame.render_widget(canvas, area);
    }
}
