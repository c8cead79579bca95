use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use sitefx_core::Surface;

use crate::app::App;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Stacks toasts that have slid in at the top right
pub struct ToastWidget;

impl ToastWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let surface = app.page.surface();
        let width = TOAST_WIDTH.min(area.width);
        let mut y = area.y + 1u16.min(area.height);

        for toast in app.page.notifications().active() {
            // Off-screen until the slide-in step runs, and again after slide-out
            if surface.style(toast.element, "transform").as_deref() != Some("translateX(0)") {
                continue;
            }
            if y + TOAST_HEIGHT > area.y + area.height {
                break;
            }
            let cell = Rect::new(area.x + area.width - width, y, width, TOAST_HEIGHT);
            let color = app.theme.toast(toast.kind);

            frame.render_widget(Clear, cell);
            let block = Block::default()
                .title(Span::styled(
                    format!(" {} ", toast.kind),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(app.theme.bg1));
            let body = Paragraph::new(Line::from(Span::styled(
                toast.message.as_str(),
                Style::default().fg(app.theme.fg1),
            )))
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(body, cell);

            y += TOAST_HEIGHT;
        }
    }
}
