use std::time::{Duration, Instant};

use sitefx_core::form::FormField;
use sitefx_core::loader::Increment;
use sitefx_core::surface::{landing_page, selectors};
use sitefx_core::{AppConfig, MemorySurface, Page, PageEvent, Surface};
use tracing::debug;

use crate::input::Action;
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scrolling the page
    Browse,
    /// Typing into a contact form field
    Editing(FormField),
    /// Help overlay
    Help,
}

/// Terminal preview state: one running page plus the UI around it
pub struct App {
    pub page: Page<MemorySurface>,
    pub theme: Theme,
    pub mode: Mode,
    /// Text typed while editing a field
    pub input: String,
    pub should_quit: bool,
    pub status_message: Option<String>,
    px_per_row: f64,
    px_per_col: f64,
    scroll_step: f64,
    origin: Instant,
}

impl App {
    /// Build the landing page sized to a terminal of `cols` x `rows`
    pub fn new(config: AppConfig, theme: Theme, cols: u16, rows: u16) -> sitefx_core::Result<Self> {
        Self::build(config, theme, cols, rows, None)
    }

    /// Same as [`App::new`] with a fixed progress source
    pub fn with_increment(
        config: AppConfig,
        theme: Theme,
        cols: u16,
        rows: u16,
        increment: Increment,
    ) -> sitefx_core::Result<Self> {
        Self::build(config, theme, cols, rows, Some(increment))
    }

    fn build(
        config: AppConfig,
        theme: Theme,
        cols: u16,
        rows: u16,
        increment: Option<Increment>,
    ) -> sitefx_core::Result<Self> {
        let px_per_row = config.ui.px_per_row;
        let px_per_col = config.ui.px_per_col;
        let scroll_step = config.ui.scroll_step_px;
        let (width, height) = surface_size(cols, rows, px_per_col, px_per_row);

        let mut page = Page::new(landing_page(width, height), config)?;
        if let Some(increment) = increment {
            page = page.with_increment(increment);
        }
        Ok(Self {
            page,
            theme,
            mode: Mode::Browse,
            input: String::new(),
            should_quit: false,
            status_message: None,
            px_per_row,
            px_per_col,
            scroll_step,
            origin: Instant::now(),
        })
    }

    /// Fire the page-ready signal and start the clock
    pub fn start(&mut self) {
        self.origin = Instant::now();
        self.page.start();
    }

    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Catch the page up to wall-clock time
    pub fn update(&mut self) {
        self.update_to(self.elapsed());
    }

    /// Catch the page up to `now` since start
    pub fn update_to(&mut self, now: Duration) {
        self.page.advance_to(now);
        self.page.frame(now);
    }

    /// How long the event loop may sleep before a timer is due
    pub fn until_next_timer(&mut self) -> Option<Duration> {
        let now = self.elapsed();
        self.page.next_deadline().map(|at| at.saturating_sub(now))
    }

    pub fn px_per_row(&self) -> f64 {
        self.px_per_row
    }

    pub fn px_per_col(&self) -> f64 {
        self.px_per_col
    }

    /// The terminal changed size; the page viewport follows
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = surface_size(cols, rows, self.px_per_col, self.px_per_row);
        self.page.surface_mut().resize(width, height);
        self.page.handle(PageEvent::Resized);
    }

    /// Hrefs of the navigation links, in order
    pub fn nav_targets(&self) -> Vec<String> {
        let surface = self.page.surface();
        surface
            .query(selectors::NAV_LINKS)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| surface.attribute(id, "href"))
            .collect()
    }

    /// Current value of a form field
    pub fn field_value(&self, field: FormField) -> String {
        let surface = self.page.surface();
        surface
            .query_one(field.selector())
            .ok()
            .flatten()
            .and_then(|id| surface.value(id).ok())
            .unwrap_or_default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.page.handle(PageEvent::ScrollBy(self.scroll_step)),
            Action::ScrollUp => self.page.handle(PageEvent::ScrollBy(-self.scroll_step)),
            Action::PageDown => {
                let page = self.page.surface().viewport().height * 0.9;
                self.page.handle(PageEvent::ScrollBy(page));
            }
            Action::PageUp => {
                let page = self.page.surface().viewport().height * 0.9;
                self.page.handle(PageEvent::ScrollBy(-page));
            }
            Action::ScrollToTop => self.page.handle(PageEvent::ScrollToTop),
            Action::ScrollToBottom => {
                let bottom = self.page.surface().max_scroll();
                self.page.handle(PageEvent::ScrollTo(bottom));
            }
            Action::JumpToSection(index) => match self.nav_targets().into_iter().nth(index) {
                Some(href) => self.page.handle(PageEvent::NavClick(href)),
                None => debug!(index, "No nav link at index"),
            },
            Action::EditField(field) => {
                self.input = self.field_value(field);
                self.mode = Mode::Editing(field);
            }
            Action::InputChar(c) => self.input.push(c),
            Action::Backspace => {
                self.input.pop();
            }
            Action::ConfirmField => {
                if let Mode::Editing(field) = self.mode {
                    let value = std::mem::take(&mut self.input);
                    self.page.handle(PageEvent::Fill { field, value });
                }
                self.mode = Mode::Browse;
            }
            Action::Cancel => {
                self.input.clear();
                self.mode = Mode::Browse;
            }
            Action::Submit => self.page.handle(PageEvent::Submit),
            Action::ToggleHelp => {
                self.mode = match self.mode {
                    Mode::Help => Mode::Browse,
                    _ => Mode::Help,
                };
            }
            Action::None => {}
        }
    }
}

/// Page pixels for a terminal of `cols` x `rows`; one row is kept for the status bar
pub fn surface_size(cols: u16, rows: u16, px_per_col: f64, px_per_row: f64) -> (f64, f64) {
    let width = cols.max(1) as f64 * px_per_col;
    let height = rows.saturating_sub(1).max(1) as f64 * px_per_row;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn app() -> App {
        let mut app =
            App::with_increment(AppConfig::default(), Theme::default(), 160, 41, Increment::Fixed(50.0)).unwrap();
        app.start();
        app
    }

    #[test]
    fn test_surface_matches_terminal() {
        let app = app();
        let viewport = app.page.surface().viewport();
        assert_eq!(viewport.width, 1280.0);
        assert_eq!(viewport.height, 800.0);
    }

    #[test]
    fn test_scroll_actions() {
        let mut app = app();
        app.update_to(ms(3000));
        app.apply(Action::ScrollDown);
        assert_eq!(app.page.surface().viewport().scroll_y, 60.0);
        app.apply(Action::ScrollUp);
        app.apply(Action::ScrollUp);
        assert_eq!(app.page.surface().viewport().scroll_y, 0.0);
        app.apply(Action::ScrollToBottom);
        assert_eq!(app.page.surface().viewport().scroll_y, app.page.surface().max_scroll());
    }

    #[test]
    fn test_edit_field_fills_form() {
        let mut app = app();
        app.apply(Action::EditField(FormField::Name));
        assert_eq!(app.mode, Mode::Editing(FormField::Name));
        for c in "Adx".chars() {
            app.apply(Action::InputChar(c));
        }
        app.apply(Action::Backspace);
        app.apply(Action::InputChar('a'));
        app.apply(Action::ConfirmField);

        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.field_value(FormField::Name), "Ada");
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_cancel_keeps_old_value() {
        let mut app = app();
        app.apply(Action::EditField(FormField::Email));
        app.apply(Action::InputChar('x'));
        app.apply(Action::Cancel);
        assert_eq!(app.field_value(FormField::Email), "");
    }

    #[test]
    fn test_jump_to_section_starts_smooth_scroll() {
        let mut app = app();
        app.update_to(ms(3000));
        assert_eq!(app.nav_targets().len(), 5);
        app.apply(Action::JumpToSection(1));
        assert!(app.page.is_scrolling());
        app.apply(Action::JumpToSection(9));
    }

    #[test]
    fn test_resize_follows_terminal() {
        let mut app = app();
        app.resize(100, 31);
        let viewport = app.page.surface().viewport();
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 600.0);
    }

    #[test]
    fn test_help_toggles() {
        let mut app = app();
        app.apply(Action::ToggleHelp);
        assert_eq!(app.mode, Mode::Help);
        app.apply(Action::ToggleHelp);
        assert_eq!(app.mode, Mode::Browse);
        app.apply(Action::Quit);
        assert!(app.should_quit);
    }
}
