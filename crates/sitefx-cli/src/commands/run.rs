use std::fs::{File, OpenOptions};
use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tracing::info;

use sitefx_core::AppConfig;
use sitefx_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{LoaderWidget, PageViewWidget, PopupWidget, StatusBarWidget, ToastWidget},
    Theme,
};

/// Open the append-only log file used while the preview owns the terminal
pub fn open_log(config: &AppConfig) -> Result<File> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(&path)?)
}

pub async fn run(config: AppConfig) -> Result<()> {
    let frame_period = config.scroll.frame_duration();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("sitefx"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, frame_period);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: AppConfig,
    frame_period: Duration,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, Theme::default(), size.width, size.height)?;
    let event_handler = EventHandler::new(frame_period);

    app.start();
    info!(cols = size.width, rows = size.height, "Terminal preview started");

    // Main loop
    loop {
        // Fire due timers and sample the display frame
        app.update();

        terminal.draw(|frame| draw(frame, &app))?;

        // Wake for the next frame or the next timer, whichever is sooner
        let timeout = app
            .until_next_timer()
            .map_or(event_handler.tick_rate(), |t| t.min(event_handler.tick_rate()));
        if let Some(event) = event_handler.next_within(timeout)? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    app.apply(action);
                }
                AppEvent::Resize(w, h) => app.resize(w, h),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.page.teardown();
    info!(failures = app.page.diagnostics().len(), "Terminal preview stopped");
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    // Main layout: page + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    if LoaderWidget::is_visible(app) {
        LoaderWidget::render(frame, main_layout[0], app);
    } else {
        PageViewWidget::render(frame, main_layout[0], app);
    }
    ToastWidget::render(frame, main_layout[0], app);
    StatusBarWidget::render(frame, main_layout[1], app);

    // Overlays on top
    match app.mode {
        Mode::Editing(field) => PopupWidget::render_field_editor(frame, field, &app.input, &app.theme),
        Mode::Help => PopupWidget::render_help(frame, &app.theme),
        Mode::Browse => {}
    }
}
