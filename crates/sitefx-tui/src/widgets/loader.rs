use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use sitefx_core::surface::{classes, selectors};
use sitefx_core::{MemorySurface, Surface};

use super::popup::centered_rect;
use crate::app::App;
use crate::theme::Theme;

/// Full-screen loader overlay, shown while the loader element is attached
pub struct LoaderWidget;

impl LoaderWidget {
    pub fn is_visible(app: &App) -> bool {
        matches!(app.page.surface().query_one(selectors::LOADER), Ok(Some(_)))
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let surface = app.page.surface();
        let Ok(Some(loader)) = surface.query_one(selectors::LOADER) else {
            return;
        };
        let theme = &app.theme;
        let fading = surface.has_class(loader, classes::FADE_OUT);
        let (fg, accent) = if fading {
            (theme.grey0, theme.grey0)
        } else {
            (theme.fg0, theme.accent)
        };

        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let highlights = highlight_lines(surface, theme, fading);
        let height = (highlights.len() as u16 + 8).min(area.height);
        let panel = centered_rect(60u16.min(area.width), height, area);

        let block = Block::default()
            .title(" Welcome ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                       // Percentage
                Constraint::Length(1),                       // Gauge
                Constraint::Length(1),                       // Spacer
                Constraint::Length(highlights.len() as u16), // Highlights
                Constraint::Length(1),                       // Spacer
                Constraint::Length(1),                       // Status label
            ])
            .split(inner);

        let percentage = text_of(surface, selectors::PROGRESS_PERCENTAGE).unwrap_or_else(|| "0".to_string());
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{}%", percentage),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            chunks[0],
        );

        let ratio = (app.page.loader().progress() / 100.0).clamp(0.0, 1.0);
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(accent).bg(theme.bg1))
                .ratio(ratio)
                .label(""),
            chunks[1],
        );

        frame.render_widget(Paragraph::new(highlights).alignment(Alignment::Center), chunks[3]);

        let status = text_of(surface, selectors::STATUS_LABEL).unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(status, Style::default().fg(fg))))
                .alignment(Alignment::Center),
            chunks[5],
        );
    }
}

fn text_of(surface: &MemorySurface, selector: &str) -> Option<String> {
    let id = surface.query_one(selector).ok().flatten()?;
    surface.text(id).ok()
}

fn highlight_lines(surface: &MemorySurface, theme: &Theme, fading: bool) -> Vec<Line<'static>> {
    surface
        .query(selectors::HIGHLIGHT_ITEMS)
        .unwrap_or_default()
        .into_iter()
        .map(|id| {
            let text = surface.text(id).unwrap_or_default();
            if surface.has_class(id, classes::ACTIVE) && !fading {
                Line::from(Span::styled(
                    format!("> {} <", text),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(text, Style::default().fg(theme.grey1)))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};
    use sitefx_core::loader::Increment;
    use sitefx_core::AppConfig;

    use super::*;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_overlay_shows_progress_until_removed() {
        let mut app =
            App::with_increment(AppConfig::default(), Theme::default(), 100, 31, Increment::Fixed(10.0)).unwrap();
        app.start();
        app.update_to(Duration::from_millis(150));
        assert!(LoaderWidget::is_visible(&app));

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| LoaderWidget::render(f, f.area(), &app)).unwrap();
        let content = screen(&terminal);
        assert!(content.contains("10%"));
        assert!(content.contains("Residential Construction"));

        app.update_to(Duration::from_millis(10_000));
        assert!(!LoaderWidget::is_visible(&app));
    }
}
