//! Page wiring
//!
//! [`Page`] owns the surface, the timer queue and every component. Input
//! arrives through [`Page::handle`], timers fire through
//! [`Page::advance_to`] and display refreshes through [`Page::frame`]. Each
//! dispatched task is isolated: a failure is logged and recorded, and the
//! rest of the page keeps running.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::effects::{
    create_floating_elements, link_target, stagger_cards, ActiveLink, Canvas, CounterAnimator, NavbarScroll,
    Parallax, ParticleField, ScrollReveal, ScrollTopButton,
};
use crate::form::{ContactForm, FormField, SubmitOutcome};
use crate::loader::{Increment, LoaderEvent, LoaderSequence, LoaderTask};
use crate::motion::SmoothScroll;
use crate::notify::{NotificationCenter, ToastKind, ToastStep};
use crate::surface::{selectors, ElementId, Surface};
use crate::timer::{RateLimiter, TimerQueue};
use crate::Result;

/// Longest gap one frame may advance the backdrop by
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Everything the page schedules on its timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Loader(LoaderTask),
    /// Reveal, parallax and counter observation
    ScrollEffects,
    Parallax,
    Navbar,
    ActiveLink,
    ScrollTop,
    Resize,
    CounterStep(usize),
    Toast(ElementId, ToastStep),
    FormComplete,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loader(LoaderTask::ProgressTick) => "progress",
            Self::Loader(LoaderTask::HighlightTick) => "highlight",
            Self::Loader(LoaderTask::MessageTick) => "message",
            Self::Loader(LoaderTask::Settle) => "settle",
            Self::Loader(LoaderTask::Completion(_)) => "completion",
            Self::ScrollEffects => "scroll_effects",
            Self::Parallax => "parallax",
            Self::Navbar => "navbar",
            Self::ActiveLink => "active_link",
            Self::ScrollTop => "scroll_top",
            Self::Resize => "resize",
            Self::CounterStep(_) => "counter",
            Self::Toast(..) => "toast",
            Self::FormComplete => "form",
        }
    }
}

impl From<LoaderTask> for Task {
    fn from(task: LoaderTask) -> Self {
        Self::Loader(task)
    }
}

/// Input delivered to the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// User scrolled to an absolute offset
    ScrollTo(f64),
    /// User scrolled by a delta
    ScrollBy(f64),
    /// The host resized the surface
    Resized,
    /// A navigation link with this `href` was clicked
    NavClick(String),
    ScrollToTop,
    Fill { field: FormField, value: String },
    Submit,
}

/// A task failure recorded for inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub at_ms: u64,
    pub task: &'static str,
    pub error: String,
}

#[derive(Debug)]
struct Limiters {
    scroll_effects: RateLimiter,
    parallax: RateLimiter,
    navbar: RateLimiter,
    active_link: RateLimiter,
    scroll_top: RateLimiter,
    resize: RateLimiter,
}

impl Limiters {
    fn new(config: &AppConfig) -> Self {
        let ms = Duration::from_millis;
        let effects = &config.effects;
        Self {
            scroll_effects: RateLimiter::throttle(ms(effects.scroll_throttle_ms)),
            parallax: RateLimiter::throttle(ms(effects.parallax_throttle_ms)),
            navbar: RateLimiter::throttle(ms(effects.navbar_throttle_ms)),
            active_link: RateLimiter::throttle(ms(effects.nav_link_throttle_ms)),
            scroll_top: RateLimiter::throttle(ms(effects.scroll_top_throttle_ms)),
            resize: RateLimiter::debounce(ms(effects.resize_debounce_ms)),
        }
    }

    fn cancel_all(&mut self, queue: &mut TimerQueue<Task>) {
        self.scroll_effects.cancel(queue);
        self.parallax.cancel(queue);
        self.navbar.cancel(queue);
        self.active_link.cancel(queue);
        self.scroll_top.cancel(queue);
        self.resize.cancel(queue);
    }
}

/// A running page: loader, scroll effects, backdrop, toasts and form
pub struct Page<S: Surface> {
    surface: S,
    config: AppConfig,
    queue: TimerQueue<Task>,
    loader: LoaderSequence,
    reveal: ScrollReveal,
    parallax: Parallax,
    counters: CounterAnimator,
    particles: Option<ParticleField>,
    navbar: NavbarScroll,
    active_link: ActiveLink,
    scroll_top: Option<ScrollTopButton>,
    smooth: SmoothScroll,
    notifications: NotificationCenter,
    form: ContactForm,
    limiters: Limiters,
    started: bool,
    steady: bool,
    torn_down: bool,
    last_frame: Option<Duration>,
    diagnostics: Vec<Diagnostic>,
}

impl<S: Surface> Page<S> {
    pub fn new(surface: S, config: AppConfig) -> Result<Self> {
        let loader = LoaderSequence::new(&surface, &config.loader)?;
        let reveal = ScrollReveal::new(&surface, config.effects.reveal_threshold_px)?;
        let parallax = Parallax::new(&surface, config.effects.default_parallax_speed)?;
        let counters = CounterAnimator::new(&surface, &config.counter)?;
        let particles = ParticleField::for_hero(&surface, &config.particles, config.loader.seed)?;
        let navbar = NavbarScroll::new(&surface, config.effects.navbar_scrolled_at)?;
        let active_link = ActiveLink::new(&surface)?;
        let form = ContactForm::new(&surface, &config.form)?;

        Ok(Self {
            loader,
            reveal,
            parallax,
            counters,
            particles,
            navbar,
            active_link,
            scroll_top: None,
            smooth: SmoothScroll::new(config.scroll.clone()),
            notifications: NotificationCenter::new(&config.notifications),
            form,
            limiters: Limiters::new(&config),
            queue: TimerQueue::new(),
            surface,
            config,
            started: false,
            steady: false,
            torn_down: false,
            last_frame: None,
            diagnostics: Vec::new(),
        })
    }

    /// Replace the loader's increment source; call before `start`
    pub fn with_increment(mut self, increment: Increment) -> Self {
        self.loader = self.loader.with_increment(increment);
        self
    }

    /// The page-ready signal: start the loader and one-time setup
    pub fn start(&mut self) {
        if self.started || self.torn_down {
            return;
        }
        self.started = true;

        let result = stagger_cards(&mut self.surface).map(|n| debug!(cards = n, "Staggered card entrances"));
        self.record("stagger", result);

        let result = create_floating_elements(&mut self.surface, self.config.loader.seed)
            .map(|n| debug!(elements = n, "Created floating elements"));
        self.record("floating", result);

        match ScrollTopButton::install(&mut self.surface, self.config.effects.scroll_top_visible_at) {
            Ok(button) => self.scroll_top = Some(button),
            Err(e) => self.record("scroll_top", Err(e)),
        }

        let result = self.loader.start(&mut self.surface, &mut self.queue);
        self.record("loader", result);
        info!(
            particles = self.particles.as_ref().map(|p| p.len()).unwrap_or(0),
            reveal = self.reveal.len(),
            counters = self.counters.len(),
            "Page started"
        );
    }

    /// Deliver an input event
    pub fn handle(&mut self, event: PageEvent) {
        if self.torn_down {
            return;
        }
        match event {
            PageEvent::ScrollTo(y) => {
                self.smooth.cancel();
                self.surface.scroll_to(y);
                self.on_scroll();
            }
            PageEvent::ScrollBy(dy) => {
                self.smooth.cancel();
                let y = self.surface.viewport().scroll_y + dy;
                self.surface.scroll_to(y);
                self.on_scroll();
            }
            PageEvent::Resized => self.on_resize(),
            PageEvent::NavClick(href) => match link_target(&self.surface, &href) {
                Ok(Some(target)) => self.smooth_scroll_to(target),
                Ok(None) => debug!(href = %href, "Nav link has no target"),
                Err(e) => self.record("nav_click", Err(e)),
            },
            PageEvent::ScrollToTop => self.smooth_scroll_to(0.0),
            PageEvent::Fill { field, value } => {
                let result = self.form.fill(&mut self.surface, field, &value);
                self.record("form", result);
            }
            PageEvent::Submit => self.submit(),
        }
    }

    /// Fire every timer due at or before `now`, in deadline order
    pub fn advance_to(&mut self, now: Duration) {
        while let Some((_, task)) = self.queue.pop_due(now) {
            self.dispatch(task);
        }
        self.queue.advance_clock(now);
    }

    /// Deadline of the next scheduled task
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// Display refresh: advance the backdrop and any smooth scroll
    ///
    /// Returns true when the scroll position changed.
    pub fn frame(&mut self, now: Duration) -> bool {
        if self.torn_down {
            return false;
        }
        let dt = self
            .last_frame
            .map(|last| now.saturating_sub(last).min(MAX_FRAME_STEP))
            .unwrap_or_default();
        self.last_frame = Some(now);
        if let Some(particles) = self.particles.as_mut() {
            particles.advance(dt);
        }

        match self.smooth.sample(now) {
            Some(y) => {
                self.surface.scroll_to(y);
                self.on_scroll();
                true
            }
            None => false,
        }
    }

    pub fn draw_particles(&self, canvas: &mut dyn Canvas) {
        if let Some(particles) = &self.particles {
            particles.draw(canvas);
        }
    }

    /// Cancel every timer and stop reacting to input
    pub fn teardown(&mut self) {
        self.loader.teardown(&mut self.queue);
        self.counters.teardown(&mut self.queue);
        self.notifications.teardown(&mut self.queue);
        self.form.teardown(&mut self.queue);
        self.limiters.cancel_all(&mut self.queue);
        self.queue.clear();
        self.smooth.cancel();
        self.torn_down = true;
        debug!("Page torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Steady-state effects (reveal, parallax, counters) are running
    pub fn is_steady(&self) -> bool {
        self.steady
    }

    /// Loader gone, entrances finished and nothing left scheduled
    pub fn is_settled(&self) -> bool {
        self.steady && self.queue.active_count() == 0 && !self.smooth.is_animating()
    }

    pub fn active_timers(&self) -> usize {
        self.queue.active_count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn loader(&self) -> &LoaderSequence {
        &self.loader
    }

    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn is_scrolling(&self) -> bool {
        self.smooth.is_animating()
    }

    /// Show a toast
    pub fn notify(&mut self, kind: ToastKind, message: &str) {
        let result = self
            .notifications
            .show(&mut self.surface, &mut self.queue, kind, message, Task::Toast)
            .map(|_| ());
        self.record("toast", result);
    }

    fn smooth_scroll_to(&mut self, target: f64) {
        let from = self.surface.viewport().scroll_y;
        if let Some(y) = self.smooth.scroll_to(from, target) {
            self.surface.scroll_to(y);
            self.on_scroll();
        }
    }

    fn on_scroll(&mut self) {
        let queue = &mut self.queue;
        let limiters = &mut self.limiters;
        limiters.navbar.call(queue, Task::Navbar);
        limiters.active_link.call(queue, Task::ActiveLink);
        limiters.scroll_top.call(queue, Task::ScrollTop);
        if self.steady {
            limiters.scroll_effects.call(queue, Task::ScrollEffects);
            if !self.parallax.is_empty() {
                limiters.parallax.call(queue, Task::Parallax);
            }
        }
    }

    fn on_resize(&mut self) {
        if let Some(particles) = self.particles.as_mut() {
            if let Ok(Some(hero)) = self.surface.query_one(selectors::HERO) {
                if let Ok(rect) = self.surface.bounding_box(hero) {
                    particles.resize(rect.width, rect.height);
                }
            }
        }
        self.limiters.resize.call(&mut self.queue, Task::Resize);
    }

    fn submit(&mut self) {
        match self.form.submit(&mut self.surface, &mut self.queue, Task::FormComplete) {
            Ok(SubmitOutcome::Invalid(message)) => self.notify(ToastKind::Error, &message),
            Ok(outcome) => debug!(?outcome, "Form submit"),
            Err(e) => self.record("form", Err(e)),
        }
    }

    fn dispatch(&mut self, task: Task) {
        let result = match task {
            Task::Loader(task) => match self.loader.run(task, &mut self.surface, &mut self.queue) {
                Ok(event) => {
                    self.on_loader_event(event);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Task::ScrollEffects => self.scroll_effects(),
            Task::Parallax | Task::Resize => {
                if self.steady {
                    self.parallax.update(&mut self.surface)
                } else {
                    Ok(())
                }
            }
            Task::Navbar => self.navbar.update(&mut self.surface).map(|_| ()),
            Task::ActiveLink => self.active_link.update(&mut self.surface).map(|_| ()),
            Task::ScrollTop => match &self.scroll_top {
                Some(button) => button.update(&mut self.surface).map(|_| ()),
                None => Ok(()),
            },
            Task::CounterStep(index) => self
                .counters
                .step(index, &mut self.surface, &mut self.queue)
                .map(|_| ()),
            Task::Toast(element, step) => {
                self.notifications
                    .run(element, step, &mut self.surface, &mut self.queue, Task::Toast)
            }
            Task::FormComplete => match self.form.complete(&mut self.surface) {
                Ok(Some(message)) => {
                    self.notify(ToastKind::Success, &message);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            },
        };
        self.record(task.name(), result);
    }

    fn on_loader_event(&mut self, event: LoaderEvent) {
        match event {
            LoaderEvent::None => {}
            LoaderEvent::Completed => debug!(at_ms = self.now_ms(), "Progress reached 100"),
            LoaderEvent::ContentRevealed => {
                self.steady = true;
                info!(at_ms = self.now_ms(), "Content revealed, scroll effects enabled");
                let result = self.scroll_effects();
                self.record("scroll_effects", result);
            }
        }
    }

    /// One pass of the steady-state scroll work
    fn scroll_effects(&mut self) -> Result<()> {
        if !self.steady {
            return Ok(());
        }
        let revealed = self.reveal.check(&mut self.surface);
        let parallax = self.parallax.update(&mut self.surface);
        let counters = self
            .counters
            .observe(&self.surface, &mut self.queue, Task::CounterStep);
        revealed?;
        parallax?;
        counters.map(|_| ())
    }

    fn record(&mut self, task: &'static str, result: Result<()>) {
        if let Err(e) = result {
            error!(task, error = %e, "Page task failed");
            self.diagnostics.push(Diagnostic {
                at_ms: self.now_ms(),
                task,
                error: e.to_string(),
            });
        }
    }

    fn now_ms(&self) -> u64 {
        self.queue.now().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CompletionStage;
    use crate::surface::{classes, landing_page, MemorySurface};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn page(increment: f64) -> Page<MemorySurface> {
        let mut config = AppConfig::default();
        config.loader.seed = Some(11);
        Page::new(landing_page(1280.0, 800.0), config)
            .unwrap()
            .with_increment(Increment::Fixed(increment))
    }

    /// Loader with a step of 50 finishes at 300ms and reveals content at 2400ms
    fn revealed_page() -> Page<MemorySurface> {
        let mut page = page(50.0);
        page.start();
        page.advance_to(ms(3000));
        assert!(page.is_steady());
        page
    }

    #[test]
    fn test_loader_runs_to_content_reveal() {
        let mut page = page(1.0);
        page.start();

        page.advance_to(ms(14_999));
        assert!(!page.loader().is_complete());
        page.advance_to(ms(15_000));
        assert!(page.loader().is_complete());
        assert_eq!(page.loader().progress_ticks(), 100);

        page.advance_to(ms(17_099));
        assert!(!page.is_steady());
        page.advance_to(ms(17_100));
        assert!(page.is_steady());
        assert_eq!(page.loader().stage(), CompletionStage::Removed);

        page.advance_to(ms(20_000));
        assert_eq!(page.active_timers(), 0);
        assert!(page.diagnostics().is_empty());
    }

    #[test]
    fn test_effects_wait_for_steady_state() {
        let mut page = page(1.0);
        page.start();
        page.handle(PageEvent::ScrollTo(1500.0));
        page.advance_to(ms(1000));

        let heading = page.surface().query("h2.reveal").unwrap()[0];
        assert!(!page.surface().has_class(heading, classes::REVEALED));

        // Navbar state runs from the start
        let navbar = page.surface().query_one(selectors::NAVBAR).unwrap().unwrap();
        assert!(page.surface().has_class(navbar, classes::SCROLLED));
    }

    #[test]
    fn test_reveal_is_one_way() {
        let mut page = revealed_page();
        let project = page.surface().query(".project-card").unwrap()[0];
        assert!(!page.surface().has_class(project, classes::REVEALED));

        page.handle(PageEvent::ScrollTo(2200.0));
        page.advance_to(ms(3100));
        assert!(page.surface().has_class(project, classes::REVEALED));

        page.handle(PageEvent::ScrollTo(0.0));
        page.advance_to(ms(3200));
        assert!(page.surface().has_class(project, classes::REVEALED));
    }

    #[test]
    fn test_scroll_burst_is_throttled() {
        let mut page = revealed_page();
        let layer = page.surface().query(selectors::PARALLAX).unwrap()[0];

        for y in [10.0, 20.0, 30.0, 40.0] {
            page.handle(PageEvent::ScrollTo(y));
        }
        // One pending run per limiter, not one per event
        assert_eq!(page.active_timers(), 5);

        page.advance_to(ms(3020));
        assert_eq!(
            page.surface().style(layer, "transform").as_deref(),
            Some("translateY(-12px)")
        );
    }

    #[test]
    fn test_counter_animates_once_visible() {
        let mut page = revealed_page();
        let counter = page.counters().element(0).unwrap();

        page.handle(PageEvent::ScrollTo(1200.0));
        page.advance_to(ms(3020));
        page.advance_to(ms(3020 + 2000));
        assert_eq!(page.surface().text(counter).unwrap(), "250");

        page.advance_to(ms(10_000));
        assert_eq!(page.surface().text(counter).unwrap(), "250");
    }

    #[test]
    fn test_empty_email_shows_error_toast() {
        let mut page = revealed_page();
        page.handle(PageEvent::Fill { field: FormField::Name, value: "Ada".into() });
        page.handle(PageEvent::Fill { field: FormField::Message, value: "Hello".into() });
        page.handle(PageEvent::Submit);

        let toasts = page.notifications().active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "Please fill in all required fields.");

        let name = page.surface().query_one(selectors::FIELD_NAME).unwrap().unwrap();
        let message = page.surface().query_one(selectors::FIELD_MESSAGE).unwrap().unwrap();
        assert_eq!(page.surface().value(name).unwrap(), "Ada");
        assert_eq!(page.surface().value(message).unwrap(), "Hello");
    }

    #[test]
    fn test_valid_submit_shows_success_toast() {
        let mut page = revealed_page();
        for (field, value) in [
            (FormField::Name, "Ada"),
            (FormField::Email, "ada@example.com"),
            (FormField::Message, "Hello"),
        ] {
            page.handle(PageEvent::Fill { field, value: value.to_string() });
        }
        page.handle(PageEvent::Submit);
        assert!(page.notifications().active().is_empty());

        page.advance_to(ms(5000));
        let toasts = page.notifications().active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert!(toasts[0].message.contains("Ada"));

        page.advance_to(ms(11_000));
        assert!(page.notifications().active().is_empty());
    }

    #[test]
    fn test_nav_click_smooth_scrolls_to_section() {
        let mut page = revealed_page();
        page.handle(PageEvent::NavClick("#about".into()));
        assert!(page.is_scrolling());

        let mut now = ms(3000);
        while page.is_scrolling() {
            page.frame(now);
            page.advance_to(now);
            now += ms(16);
        }
        assert_eq!(page.surface().viewport().scroll_y, 1630.0);

        page.advance_to(now + ms(200));
        let links = page.surface().query(selectors::NAV_LINKS).unwrap();
        assert!(page.surface().has_class(links[2], classes::ACTIVE));
    }

    #[test]
    fn test_scroll_to_top_button() {
        let mut page = revealed_page();
        page.handle(PageEvent::ScrollTo(900.0));
        page.advance_to(ms(3100));
        let button = page.surface().query_one(".scroll-to-top").unwrap().unwrap();
        assert!(page.surface().has_class(button, classes::VISIBLE));

        page.handle(PageEvent::ScrollToTop);
        let mut now = ms(3100);
        while page.is_scrolling() {
            page.frame(now);
            now += ms(16);
        }
        page.advance_to(now + ms(200));
        assert_eq!(page.surface().viewport().scroll_y, 0.0);
        assert!(!page.surface().has_class(button, classes::VISIBLE));
    }

    #[test]
    fn test_particles_keep_running() {
        let mut page = page(1.0);
        page.start();
        let before = page.particles().unwrap().particles().to_vec();
        for frame in 0..60 {
            page.frame(ms(frame * 16));
        }
        let after = page.particles().unwrap().particles();
        assert_eq!(after.len(), before.len());
        assert_ne!(after, &before[..]);
    }

    #[test]
    fn test_start_adds_floating_elements_once() {
        let mut page = page(1.0);
        page.start();
        page.start();
        assert_eq!(page.surface().query(".floating-element").unwrap().len(), 6);
        assert_eq!(page.surface().query(".floating-elements").unwrap().len(), 1);
        assert!(page.diagnostics().is_empty());
    }

    #[test]
    fn test_frame_hitch_moves_backdrop_one_capped_step() {
        let mut page = page(1.0);
        page.start();
        page.frame(ms(0));
        let before = page.particles().unwrap().particles().to_vec();

        page.frame(ms(10_000));
        let field = page.particles().unwrap();
        let (width, height) = field.bounds();
        let max_step = page.config().particles.max_speed * 6.0 + 1e-9;
        for (old, new) in before.iter().zip(field.particles()) {
            assert!((new.x - old.x).abs() <= max_step);
            assert!((new.y - old.y).abs() <= max_step);
            assert!((0.0..=width).contains(&new.x));
            assert!((0.0..=height).contains(&new.y));
        }
    }

    #[test]
    fn test_render_failure_does_not_block_completion() {
        let mut page = page(25.0);
        let fill = page.surface().query_one(selectors::PROGRESS_FILL).unwrap().unwrap();
        page.start();
        page.surface_mut().remove(fill).unwrap();

        page.advance_to(ms(10_000));
        assert!(page.is_steady());
        let failures = page.diagnostics();
        assert_eq!(failures.len(), 4);
        assert!(failures.iter().all(|d| d.task == "progress"));
        assert_eq!(failures[0].at_ms, 150);
    }

    #[test]
    fn test_detached_elements_are_skipped() {
        let mut page = revealed_page();
        let layer = page.surface().query(selectors::PARALLAX).unwrap()[0];
        let heading = page.surface().query("h2.reveal").unwrap()[0];
        page.surface_mut().remove(layer).unwrap();
        let navbar = page.surface().query_one(selectors::NAVBAR).unwrap().unwrap();
        page.surface_mut().remove(navbar).unwrap();

        page.handle(PageEvent::ScrollTo(300.0));
        page.advance_to(ms(3200));
        assert!(page.surface().has_class(heading, classes::REVEALED));
        assert!(page.diagnostics().is_empty());
    }

    #[test]
    fn test_teardown_leaves_no_timers() {
        let mut page = page(1.0);
        page.start();
        page.handle(PageEvent::ScrollTo(400.0));
        page.notify(ToastKind::Info, "hello");
        page.advance_to(ms(2000));
        assert!(page.active_timers() > 0);

        page.teardown();
        assert_eq!(page.active_timers(), 0);
        assert_eq!(page.next_deadline(), None);

        page.handle(PageEvent::ScrollTo(800.0));
        page.advance_to(ms(60_000));
        assert_eq!(page.active_timers(), 0);
        assert!(!page.loader().is_complete());
    }

    #[test]
    fn test_missing_elements_do_not_fail() {
        let mut page = Page::new(MemorySurface::new(800.0, 600.0), AppConfig::default())
            .unwrap()
            .with_increment(Increment::Fixed(25.0));
        page.start();
        page.handle(PageEvent::Submit);
        page.handle(PageEvent::NavClick("#services".into()));
        page.frame(ms(16));
        page.advance_to(ms(10_000));
        assert!(page.is_steady());
        assert!(page.particles().is_none());
        assert!(page.diagnostics().is_empty());
    }
}
