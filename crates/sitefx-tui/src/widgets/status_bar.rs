use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sitefx_core::loader::CompletionStage;
use sitefx_core::Surface;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let mode_str = match app.mode {
            Mode::Browse => "BROWSE",
            Mode::Editing(_) => "EDIT",
            Mode::Help => "HELP",
        };

        let page = &app.page;
        let stage_str = if page.is_steady() {
            "ready".to_string()
        } else {
            match page.loader().stage() {
                CompletionStage::Idle => format!("loading {:.0}%", page.loader().progress()),
                CompletionStage::Exiting | CompletionStage::Fading => "revealing".to_string(),
                CompletionStage::Removed => "entering".to_string(),
            }
        };

        let surface = page.surface();
        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else {
            let mut text = format!(
                " {} | {} | y: {:.0}/{:.0} | timers: {}",
                mode_str,
                stage_str,
                surface.viewport().scroll_y,
                surface.max_scroll(),
                page.active_timers()
            );
            let failures = page.diagnostics().len();
            if failures > 0 {
                text.push_str(&format!(" | failures: {}", failures));
            }
            text
        };

        let help_hint = " q:quit j/k:scroll 1-5:sections n/e/m:form s:send ?:help ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16) as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
