use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use sitefx_core::form::FormField;

use crate::theme::Theme;

const HELP: [(&str, &str); 9] = [
    ("j/k", "scroll"),
    ("C-d/C-u", "half page"),
    ("g/G", "top / bottom"),
    ("1-5", "jump to section"),
    ("n", "edit name"),
    ("e", "edit email"),
    ("m", "edit message"),
    ("s", "submit form"),
    ("q", "quit"),
];

pub struct PopupWidget;

impl PopupWidget {
    /// Render the key binding overlay
    pub fn render_help(frame: &mut Frame, theme: &Theme) {
        let area = frame.area();
        let popup_width = 40u16.min(area.width.saturating_sub(4));
        let popup_height = (HELP.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let lines: Vec<Line> = HELP
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>9}  ", key),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*what, Style::default().fg(theme.fg0)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }

    /// Render the single-line editor for a contact form field
    pub fn render_field_editor(frame: &mut Frame, field: FormField, input: &str, theme: &Theme) {
        let area = frame.area();
        let popup_width = 60u16.min(area.width.saturating_sub(4));
        let popup_height = 5u16.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", field.label()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Input
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Hint
            ])
            .split(inner_area);

        let visible = tail(input, inner_area.width.saturating_sub(1) as usize);
        let input_line = Line::from(vec![
            Span::styled(visible, Style::default().fg(theme.fg1)),
            Span::styled("_", Style::default().fg(theme.accent).add_modifier(Modifier::SLOW_BLINK)),
        ]);
        frame.render_widget(Paragraph::new(input_line), chunks[0]);

        let hint = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.green).add_modifier(Modifier::BOLD)),
            Span::styled(" save  ", Style::default().fg(theme.grey1)),
            Span::styled("Esc", Style::default().fg(theme.red).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(theme.grey1)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[2]);
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Last `max_len` characters of `s`, so the cursor end stays visible
fn tail(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(max_len)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 15, 40, 10));
        assert_eq!(centered_rect(200, 10, area).x, 0);
    }

    #[test]
    fn test_tail_keeps_end() {
        assert_eq!(tail("hello world", 5), "world");
        assert_eq!(tail("hi", 5), "hi");
    }
}
