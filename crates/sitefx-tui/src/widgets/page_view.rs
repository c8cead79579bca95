use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use sitefx_core::surface::{classes, selectors, ElementId};
use sitefx_core::{MemorySurface, Surface};

use super::particles::{ParticleLayer, ParticlesWidget};
use crate::app::App;
use crate::theme::Theme;

const REVEAL_CLASSES: [&str; 4] = ["reveal", "reveal-left", "reveal-right", "reveal-zoom"];

/// Renders the page body, navbar and scroll-to-top button from the surface
pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let surface = app.page.surface();
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        if is_hidden(surface, selectors::MAIN_CONTENT) {
            return;
        }

        let scroll = surface.viewport().scroll_y;
        let px_per_row = app.px_per_row();
        let px_per_col = app.px_per_col();

        Self::render_backdrop(frame, area, app, scroll);

        for id in surface.element_ids() {
            if surface.is_fixed(id) {
                continue;
            }
            let (Some(rect), Some(label)) = (surface.layout_rect(id), element_label(surface, id)) else {
                continue;
            };
            let offset = surface
                .style(id, "transform")
                .and_then(|t| translate_y_px(&t))
                .unwrap_or(0.0);
            let Some(row) = row_for(rect.y + offset - scroll, px_per_row, area.height) else {
                continue;
            };
            let col = ((rect.x / px_per_col) as u16).min(area.width.saturating_sub(1));
            let cell = Rect::new(area.x + col, area.y + row, area.width - col, 1);
            let line = Line::from(Span::styled(label, element_style(surface, id, theme)));
            frame.render_widget(Paragraph::new(line), cell);
        }

        Self::render_navbar(frame, area, surface, theme);
        Self::render_scroll_top(frame, area, surface, theme);
    }

    fn render_backdrop(frame: &mut Frame, area: Rect, app: &App, scroll: f64) {
        let surface = app.page.surface();
        let Some(hero) = surface
            .query_one(selectors::HERO)
            .ok()
            .flatten()
            .and_then(|id| surface.layout_rect(id))
        else {
            return;
        };
        let viewport_bottom = scroll + surface.viewport().height;
        let top = scroll.max(hero.top());
        let bottom = viewport_bottom.min(hero.bottom());
        if bottom <= top {
            return;
        }

        let first_row = ((top - scroll) / app.px_per_row()).floor() as u16;
        let last_row = (((bottom - scroll) / app.px_per_row()).ceil() as u16).min(area.height);
        if last_row <= first_row {
            return;
        }
        let canvas_area = Rect::new(area.x, area.y + first_row, area.width, last_row - first_row);

        let mut layer = ParticleLayer::new(app.theme.bg0);
        app.page.draw_particles(&mut layer);
        ParticlesWidget::render(
            frame,
            canvas_area,
            &layer,
            top - hero.top(),
            bottom - hero.top(),
            &app.theme,
        );
    }

    fn render_navbar(frame: &mut Frame, area: Rect, surface: &MemorySurface, theme: &Theme) {
        let Ok(Some(navbar)) = surface.query_one(selectors::NAVBAR) else {
            return;
        };
        if surface.style(navbar, "opacity").as_deref() == Some("0") {
            return;
        }
        let background = if surface.has_class(navbar, classes::SCROLLED) {
            theme.bg1
        } else {
            theme.bg0
        };

        let mut spans = vec![Span::styled(
            " SITEFX ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )];
        for (i, link) in surface.query(selectors::NAV_LINKS).unwrap_or_default().into_iter().enumerate() {
            let text = surface.text(link).unwrap_or_default();
            let style = if surface.has_class(link, classes::ACTIVE) {
                Style::default().fg(theme.active_link).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(theme.fg0)
            };
            spans.push(Span::styled(format!(" {}:", i + 1), Style::default().fg(theme.grey1)));
            spans.push(Span::styled(text, style));
        }

        let bar = Rect::new(area.x, area.y, area.width, 1u16.min(area.height));
        frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(background)), bar);
    }

    fn render_scroll_top(frame: &mut Frame, area: Rect, surface: &MemorySurface, theme: &Theme) {
        let Ok(Some(button)) = surface.query_one(&format!(".{}", classes::SCROLL_TO_TOP)) else {
            return;
        };
        if !surface.has_class(button, classes::VISIBLE) || area.width < 8 || area.height < 2 {
            return;
        }
        let cell = Rect::new(area.x + area.width - 8, area.y + area.height - 1, 7, 1);
        let label = Span::styled(" ^ top ", Style::default().fg(theme.bg0).bg(theme.accent));
        frame.render_widget(Paragraph::new(Line::from(label)), cell);
    }
}

fn is_hidden(surface: &MemorySurface, selector: &str) -> bool {
    match surface.query_one(selector) {
        Ok(Some(id)) => surface.style(id, "opacity").as_deref() == Some("0"),
        _ => false,
    }
}

/// Text shown for an element, or `None` when it has nothing to show
pub fn element_label(surface: &MemorySurface, id: ElementId) -> Option<String> {
    match surface.tag(id)? {
        "input" | "textarea" => {
            let name = surface.attribute(id, "name").unwrap_or_default();
            let value = surface.value(id).unwrap_or_default();
            Some(format!("[{}: {}]", name, value))
        }
        "button" => surface.text(id).ok().map(|t| format!("< {} >", t)),
        _ => surface.text(id).ok().filter(|t| !t.trim().is_empty()),
    }
}

fn element_style(surface: &MemorySurface, id: ElementId, theme: &Theme) -> Style {
    let pending_reveal = REVEAL_CLASSES.iter().any(|c| surface.has_class(id, c))
        && !surface.has_class(id, classes::REVEALED);
    if pending_reveal {
        return Style::default().fg(theme.hidden);
    }
    if surface.has_class(id, "stat-number") {
        return Style::default().fg(theme.stat).add_modifier(Modifier::BOLD);
    }
    match surface.tag(id) {
        Some("h1") => Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        Some("h2") => Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        Some("button") if surface.attribute(id, "disabled").is_some() => {
            Style::default().fg(theme.grey1).bg(theme.bg2)
        }
        Some("button") => Style::default().fg(theme.bg0).bg(theme.accent),
        Some("input") | Some("textarea") => Style::default().fg(theme.fg1).bg(theme.bg1),
        _ => Style::default().fg(theme.fg0),
    }
}

/// Pixel offset of a `translateY(...px)` transform
pub fn translate_y_px(transform: &str) -> Option<f64> {
    let inner = transform.trim().strip_prefix("translateY(")?.strip_suffix(')')?;
    let inner = inner.trim();
    if inner == "0" {
        return Some(0.0);
    }
    inner.strip_suffix("px")?.trim().parse().ok()
}

/// Terminal row for a viewport-relative offset, if it lands inside the area
pub fn row_for(y: f64, px_per_row: f64, height: u16) -> Option<u16> {
    if !(px_per_row > 0.0) || y < 0.0 {
        return None;
    }
    let row = (y / px_per_row).floor();
    (row < height as f64).then_some(row as u16)
}
