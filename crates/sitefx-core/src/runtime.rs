//! Async driver for a [`Page`]
//!
//! Paces the page's virtual clock with tokio time: it sleeps until the next
//! timer deadline, forwards input events, signals display refreshes on a
//! fixed interval and stops on the shutdown signal. The page is `!Send`, so
//! the driver runs on a current-thread runtime or inside a `LocalSet`.
//!
//! [`PageRuntime::run_virtual`] drives the same page on its virtual clock
//! without sleeping, for headless simulation.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::page::{Page, PageEvent};
use crate::surface::Surface;

/// Milestones reported while the page runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RuntimeEvent {
    LoadingComplete { at_ms: u64, ticks: u32 },
    ContentRevealed { at_ms: u64 },
    Settled { at_ms: u64 },
    TaskFailed { at_ms: u64, task: String, error: String },
}

impl RuntimeEvent {
    /// Single-line JSON form
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Remembers which milestones a page has already reported
#[derive(Debug, Default)]
pub struct Milestones {
    complete: bool,
    revealed: bool,
    failures: usize,
}

impl Milestones {
    /// Milestones reached since the last call
    pub fn observe<S: Surface>(&mut self, page: &Page<S>) -> Vec<RuntimeEvent> {
        let at_ms = page.now().as_millis() as u64;
        let mut events = Vec::new();
        if !self.complete && page.loader().is_complete() {
            self.complete = true;
            let ticks = page.loader().progress_ticks();
            events.push(RuntimeEvent::LoadingComplete { at_ms, ticks });
        }
        if !self.revealed && page.is_steady() {
            self.revealed = true;
            events.push(RuntimeEvent::ContentRevealed { at_ms });
        }
        for d in &page.diagnostics()[self.failures..] {
            events.push(RuntimeEvent::TaskFailed {
                at_ms: d.at_ms,
                task: d.task.to_string(),
                error: d.error.clone(),
            });
        }
        self.failures = page.diagnostics().len();
        events
    }
}

/// Input events replayed once content is revealed, one every `spacing`
#[derive(Debug, Default)]
struct Script {
    events: VecDeque<PageEvent>,
    spacing: Duration,
    next_at: Option<Duration>,
}

impl Script {
    fn is_done(&self) -> bool {
        self.events.is_empty() && self.next_at.is_none()
    }

    /// Arm the next event once the page is steady
    fn arm<S: Surface>(&mut self, page: &Page<S>, now: Duration) {
        if self.next_at.is_none() && page.is_steady() && !self.events.is_empty() {
            self.next_at = Some(now + self.spacing);
        }
    }

    /// Deliver the armed event if it is due
    fn play<S: Surface>(&mut self, page: &mut Page<S>, now: Duration) {
        if !self.next_at.is_some_and(|at| at <= now) {
            return;
        }
        self.next_at = None;
        if let Some(event) = self.events.pop_front() {
            debug!(?event, at_ms = now.as_millis() as u64, "Scripted event");
            page.handle(event);
        }
    }
}

/// Drives a page from tokio time until shutdown
pub struct PageRuntime<S: Surface> {
    page: Page<S>,
    frame_period: Duration,
    event_tx: Option<mpsc::UnboundedSender<RuntimeEvent>>,
    stop_when_settled: bool,
    milestones: Milestones,
    script: Script,
}

impl<S: Surface> PageRuntime<S> {
    pub fn new(page: Page<S>) -> Self {
        let frame_period = page.config().scroll.frame_duration();
        Self {
            page,
            frame_period,
            event_tx: None,
            stop_when_settled: false,
            milestones: Milestones::default(),
            script: Script::default(),
        }
    }

    /// Set the event sender for milestone notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<RuntimeEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Replay `events` after content is revealed, one every `spacing`
    pub fn with_script(mut self, events: Vec<PageEvent>, spacing: Duration) -> Self {
        self.script = Script {
            events: events.into(),
            spacing,
            next_at: None,
        };
        self
    }

    /// Return once the script is spent and the page has nothing left scheduled
    pub fn stop_when_settled(mut self, stop: bool) -> Self {
        self.stop_when_settled = stop;
        self
    }

    fn send_event(&self, event: RuntimeEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send runtime event: receiver dropped");
            }
        }
    }

    /// Run until shutdown (or until settled, if requested); returns the torn-down page
    pub async fn run(
        mut self,
        mut shutdown: watch::Receiver<bool>,
        mut events: mpsc::UnboundedReceiver<PageEvent>,
    ) -> Page<S> {
        let origin = Instant::now();
        let mut frames = tokio::time::interval(self.frame_period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.page.start();
        info!(frame_ms = self.frame_period.as_millis() as u64, "Page runtime started");

        loop {
            self.script.arm(&self.page, self.page.now());
            let deadline = [self.page.next_deadline(), self.script.next_at]
                .into_iter()
                .flatten()
                .min()
                .map(|d| origin + d);
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                // Handle shutdown signal
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Page runtime received shutdown signal");
                        break;
                    }
                }

                Some(event) = events.recv() => {
                    debug!(?event, "Page event");
                    self.page.handle(event);
                }

                _ = timer => {
                    let now = origin.elapsed();
                    self.page.advance_to(now);
                    self.script.play(&mut self.page, now);
                }

                _ = frames.tick() => {
                    self.page.frame(origin.elapsed());
                }
            }

            self.report();
            if self.stop_when_settled && self.is_done() {
                self.settled(self.page.now());
                break;
            }
        }

        self.page.teardown();
        self.page
    }

    /// Run on the virtual clock without sleeping, up to `limit`
    ///
    /// Jumps straight to each timer deadline, sampling display frames only
    /// while a smooth scroll is in flight. Stops once the script is spent and
    /// the page has settled; returns the torn-down page.
    pub fn run_virtual(mut self, limit: Duration) -> Page<S> {
        let mut now = Duration::ZERO;

        self.page.start();
        self.report();
        loop {
            self.script.arm(&self.page, now);
            let next_frame = self.page.is_scrolling().then(|| now + self.frame_period);
            let Some(next) = [self.page.next_deadline(), next_frame, self.script.next_at]
                .into_iter()
                .flatten()
                .min()
            else {
                break;
            };
            if next > limit {
                warn!(limit_ms = limit.as_millis() as u64, "Simulation limit reached before the page settled");
                break;
            }

            now = next;
            self.page.advance_to(now);
            self.page.frame(now);
            self.script.play(&mut self.page, now);

            self.report();
            if self.is_done() {
                self.settled(now);
                break;
            }
        }

        self.page.teardown();
        self.page
    }

    fn is_done(&self) -> bool {
        self.script.is_done() && self.page.is_settled()
    }

    fn settled(&self, now: Duration) {
        let at_ms = now.as_millis() as u64;
        info!(at_ms, "Page settled");
        self.send_event(RuntimeEvent::Settled { at_ms });
    }

    fn report(&mut self) {
        for event in self.milestones.observe(&self.page) {
            self.send_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::loader::Increment;
    use crate::surface::{landing_page, MemorySurface};

    fn page(increment: f64) -> Page<MemorySurface> {
        let mut config = AppConfig::default();
        config.loader.seed = Some(3);
        Page::new(landing_page(1280.0, 800.0), config)
            .unwrap()
            .with_increment(Increment::Fixed(increment))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<RuntimeEvent>) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn timeline() -> Vec<RuntimeEvent> {
        vec![
            RuntimeEvent::LoadingComplete { at_ms: 15_000, ticks: 100 },
            RuntimeEvent::ContentRevealed { at_ms: 17_100 },
            RuntimeEvent::Settled { at_ms: 17_400 },
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_loader_to_settled() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (_event_tx, event_rx) = mpsc::unbounded_channel();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let page = PageRuntime::new(page(1.0))
            .with_event_sender(tx)
            .stop_when_settled(true)
            .run(shutdown_rx, event_rx)
            .await;

        assert!(page.is_torn_down());
        assert_eq!(page.loader().progress_ticks(), 100);
        assert!(page.is_steady());
        assert_eq!(drain(&mut rx), timeline());
    }

    #[tokio::test(start_paused = true)]
    async fn test_forwards_events_and_stops_on_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let local = tokio::task::LocalSet::new();
        let scroll_y = local
            .run_until(async move {
                let handle = tokio::task::spawn_local(async move {
                    let page = PageRuntime::new(page(50.0)).run(shutdown_rx, event_rx).await;
                    page.surface().viewport().scroll_y
                });
                tokio::time::sleep(Duration::from_millis(3000)).await;
                event_tx.send(PageEvent::ScrollTo(500.0)).unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
                shutdown_tx.send(true).unwrap();
                handle.await.unwrap()
            })
            .await;
        assert_eq!(scroll_y, 500.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_runs_before_settling() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (_event_tx, event_rx) = mpsc::unbounded_channel();

        let page = PageRuntime::new(page(50.0))
            .with_script(vec![PageEvent::ScrollTo(900.0)], Duration::from_millis(500))
            .stop_when_settled(true)
            .run(shutdown_rx, event_rx)
            .await;
        assert_eq!(page.surface().viewport().scroll_y, 900.0);
    }

    #[test]
    fn test_virtual_run_matches_timeline() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let page = PageRuntime::new(page(1.0))
            .with_event_sender(tx)
            .run_virtual(Duration::from_secs(60));

        assert!(page.is_torn_down());
        assert_eq!(drain(&mut rx), timeline());
    }

    #[test]
    fn test_virtual_run_plays_script_after_reveal() {
        let script = vec![PageEvent::ScrollTo(1200.0), PageEvent::NavClick("#contact".into())];
        let page = PageRuntime::new(page(50.0))
            .with_script(script, Duration::from_millis(500))
            .run_virtual(Duration::from_secs(60));

        let counter = page.counters().element(0).unwrap();
        assert_eq!(page.surface().text(counter).unwrap(), "250");
        let contact = page.surface().query_one("#contact").unwrap().unwrap();
        let target = page.surface().offset_top(contact).unwrap() - 70.0;
        assert_eq!(page.surface().viewport().scroll_y, target.min(page.surface().max_scroll()));
        assert!(page.diagnostics().is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = RuntimeEvent::LoadingComplete { at_ms: 15_000, ticks: 100 };
        assert_eq!(
            event.to_json().unwrap(),
            r#"{"event":"loading_complete","at_ms":15000,"ticks":100}"#
        );
    }

    #[test]
    fn test_virtual_run_stops_at_limit() {
        let page = PageRuntime::new(page(1.0)).run_virtual(Duration::from_secs(5));
        assert!(!page.loader().is_complete());
        assert!(page.now() <= Duration::from_secs(5));
        assert_eq!(page.active_timers(), 0);
    }
}
