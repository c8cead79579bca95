use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{LoaderConfig, LoaderConfigExt};
use crate::surface::{selectors, Surface};
use crate::timer::{TimerId, TimerQueue};
use crate::Result;

use super::completion::{CompletionCoordinator, CompletionStage, CompletionTask, CompletionTimings};
use super::highlight::HighlightRotator;
use super::messages::MessageSequencer;
use super::progress::{Increment, ProgressElements, ProgressReader, ProgressSimulator, ProgressStep};

/// Work items the loader schedules on the page's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderTask {
    ProgressTick,
    HighlightTick,
    MessageTick,
    Settle,
    Completion(CompletionTask),
}

/// Transitions a loader task can report to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderEvent {
    None,
    /// Progress reached 100 on this tick
    Completed,
    /// The overlay was removed; steady-state effects may start
    ContentRevealed,
}

/// The staged loader: three startup timers converging on one exit sequence
#[derive(Debug)]
pub struct LoaderSequence {
    progress: ProgressSimulator,
    rotator: HighlightRotator,
    sequencer: MessageSequencer,
    coordinator: CompletionCoordinator,
    progress_tick: Duration,
    highlight_period: Duration,
    message_period: Duration,
    settle_delay: Duration,
    progress_timer: Option<TimerId>,
    highlight_timer: Option<TimerId>,
    message_timer: Option<TimerId>,
    settle_timer: Option<TimerId>,
    settle_scheduled: bool,
    completion_timers: Vec<TimerId>,
}

impl LoaderSequence {
    /// Locate the loader's elements; any of them may be missing
    pub fn new(surface: &dyn Surface, config: &LoaderConfig) -> Result<Self> {
        let elements = ProgressElements {
            fill: surface.query_one(selectors::PROGRESS_FILL)?,
            percentage: surface.query_one(selectors::PROGRESS_PERCENTAGE)?,
            indicator: surface.query_one(selectors::PROGRESS_INDICATOR)?,
        };
        let increment = Increment::random(config.increment_min, config.increment_max, config.seed);
        let progress = ProgressSimulator::new(increment, config.indicator_max, elements);

        let rotator = HighlightRotator::new(surface.query(selectors::HIGHLIGHT_ITEMS)?, progress.reader());
        let sequencer = MessageSequencer::new(
            surface.query_one(selectors::STATUS_LABEL)?,
            config.messages.clone(),
            config.completion_message.clone(),
            progress.reader(),
        );
        let coordinator = CompletionCoordinator::new(
            surface.query_one(selectors::LOADER)?,
            surface.query_one(selectors::MAIN_CONTENT)?,
            surface.query_one(selectors::NAVBAR)?,
            CompletionTimings::from(config),
        );

        Ok(Self {
            progress,
            rotator,
            sequencer,
            coordinator,
            progress_tick: config.progress_tick(),
            highlight_period: config.highlight_period(),
            message_period: config.message_period(),
            settle_delay: config.settle_delay(),
            progress_timer: None,
            highlight_timer: None,
            message_timer: None,
            settle_timer: None,
            settle_scheduled: false,
            completion_timers: Vec::new(),
        })
    }

    /// Replace the increment source before starting
    pub fn with_increment(mut self, increment: Increment) -> Self {
        self.progress.set_increment(increment);
        self
    }

    /// Start the three startup timers
    pub fn start<T>(&mut self, surface: &mut dyn Surface, queue: &mut TimerQueue<T>) -> Result<()>
    where
        T: Clone + From<LoaderTask>,
    {
        self.progress_timer = Some(queue.set_interval(self.progress_tick, LoaderTask::ProgressTick.into()));
        self.highlight_timer =
            Some(queue.set_interval(self.highlight_period, LoaderTask::HighlightTick.into()));
        self.message_timer = Some(queue.set_interval(self.message_period, LoaderTask::MessageTick.into()));
        info!(
            tick_ms = self.progress_tick.as_millis() as u64,
            max_ticks = self.progress.max_ticks(),
            "Loader started"
        );

        self.rotator.start(surface)?;
        self.progress.render(surface)
    }

    /// Run one loader task, scheduling whatever follows it
    ///
    /// State transitions and timer bookkeeping happen before any surface
    /// write that can fail, so an error never loses the hand-off.
    pub fn run<T>(
        &mut self,
        task: LoaderTask,
        surface: &mut dyn Surface,
        queue: &mut TimerQueue<T>,
    ) -> Result<LoaderEvent>
    where
        T: Clone + From<LoaderTask>,
    {
        match task {
            LoaderTask::ProgressTick => {
                let step = self.progress.tick();
                let event = match step {
                    ProgressStep::Completed => {
                        cancel(queue, &mut self.progress_timer);
                        self.schedule_settle(queue);
                        info!(ticks = self.progress.ticks(), "Loading complete");
                        LoaderEvent::Completed
                    }
                    ProgressStep::Finished => {
                        cancel(queue, &mut self.progress_timer);
                        return Ok(LoaderEvent::None);
                    }
                    ProgressStep::Advanced(_) => LoaderEvent::None,
                };
                self.progress.render(surface)?;
                Ok(event)
            }
            LoaderTask::HighlightTick => {
                let result = self.rotator.tick(surface);
                if !self.rotator.is_running() {
                    cancel(queue, &mut self.highlight_timer);
                }
                result.map(|step| {
                    debug!(?step, "Highlight tick");
                    LoaderEvent::None
                })
            }
            LoaderTask::MessageTick => {
                let result = self.sequencer.tick(surface);
                if self.sequencer.is_finished() {
                    cancel(queue, &mut self.message_timer);
                }
                result.map(|step| {
                    debug!(?step, "Message tick");
                    LoaderEvent::None
                })
            }
            LoaderTask::Settle => {
                self.settle_timer = None;
                self.stop_startup_timers(surface, queue);
                let followups = self.coordinator.trigger(surface);
                self.schedule_completion(queue, followups);
                Ok(LoaderEvent::None)
            }
            LoaderTask::Completion(stage) => {
                let followups = self.coordinator.run(stage, surface);
                let revealed = stage == CompletionTask::Remove && !followups.is_empty();
                self.schedule_completion(queue, followups);
                if revealed {
                    Ok(LoaderEvent::ContentRevealed)
                } else {
                    Ok(LoaderEvent::None)
                }
            }
        }
    }

    fn schedule_settle<T>(&mut self, queue: &mut TimerQueue<T>)
    where
        T: Clone + From<LoaderTask>,
    {
        if self.settle_scheduled {
            return;
        }
        self.settle_scheduled = true;
        self.settle_timer = Some(queue.set_timeout(self.settle_delay, LoaderTask::Settle.into()));
    }

    fn schedule_completion<T>(&mut self, queue: &mut TimerQueue<T>, followups: Vec<(Duration, CompletionTask)>)
    where
        T: Clone + From<LoaderTask>,
    {
        self.completion_timers.retain(|id| queue.is_active(*id));
        for (delay, stage) in followups {
            let id = queue.set_timeout(delay, LoaderTask::Completion(stage).into());
            self.completion_timers.push(id);
        }
    }

    /// Force-stop the rotator and sequencer in case their next tick is still pending
    fn stop_startup_timers<T: Clone>(&mut self, surface: &mut dyn Surface, queue: &mut TimerQueue<T>) {
        cancel(queue, &mut self.progress_timer);
        cancel(queue, &mut self.highlight_timer);
        cancel(queue, &mut self.message_timer);
        if let Err(e) = self.rotator.stop(surface) {
            warn!(error = %e, "Could not clear highlights");
        }
        if let Err(e) = self.sequencer.finish(surface) {
            warn!(error = %e, "Could not show completion message");
        }
    }

    /// Cancel every timer the loader still owns
    pub fn teardown<T: Clone>(&mut self, queue: &mut TimerQueue<T>) {
        cancel(queue, &mut self.progress_timer);
        cancel(queue, &mut self.highlight_timer);
        cancel(queue, &mut self.message_timer);
        cancel(queue, &mut self.settle_timer);
        for id in self.completion_timers.drain(..) {
            queue.cancel(id);
        }
    }

    /// No loader timer is live in `queue`
    pub fn is_quiescent<T: Clone>(&self, queue: &TimerQueue<T>) -> bool {
        [self.progress_timer, self.highlight_timer, self.message_timer, self.settle_timer]
            .iter()
            .flatten()
            .chain(self.completion_timers.iter())
            .all(|id| !queue.is_active(*id))
    }

    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    pub fn progress_reader(&self) -> ProgressReader {
        self.progress.reader()
    }

    pub fn progress_ticks(&self) -> u32 {
        self.progress.ticks()
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_finished()
    }

    pub fn stage(&self) -> CompletionStage {
        self.coordinator.stage()
    }

    pub fn is_content_revealed(&self) -> bool {
        self.coordinator.is_content_revealed()
    }

    pub fn coordinator(&self) -> &CompletionCoordinator {
        &self.coordinator
    }

    pub fn rotator(&self) -> &HighlightRotator {
        &self.rotator
    }

    pub fn sequencer(&self) -> &MessageSequencer {
        &self.sequencer
    }

    pub fn highlight_timer(&self) -> Option<TimerId> {
        self.highlight_timer
    }

    pub fn message_timer(&self) -> Option<TimerId> {
        self.message_timer
    }
}

fn cancel<T: Clone>(queue: &mut TimerQueue<T>, slot: &mut Option<TimerId>) {
    if let Some(id) = slot.take() {
        queue.cancel(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{classes, landing_page, MemorySurface};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup(increment: Increment) -> (MemorySurface, LoaderSequence, TimerQueue<LoaderTask>) {
        let surface = landing_page(1280.0, 800.0);
        let loader = LoaderSequence::new(&surface, &LoaderConfig::default())
            .unwrap()
            .with_increment(increment);
        (surface, loader, TimerQueue::new())
    }

    fn pump(
        loader: &mut LoaderSequence,
        surface: &mut MemorySurface,
        queue: &mut TimerQueue<LoaderTask>,
        until: Duration,
    ) -> Vec<(Duration, LoaderEvent)> {
        let mut events = Vec::new();
        while let Some((_, task)) = queue.pop_due(until) {
            let event = loader.run(task, surface, queue).unwrap();
            if event != LoaderEvent::None {
                events.push((queue.now(), event));
            }
        }
        events
    }

    #[test]
    fn test_fixed_increment_full_sequence() {
        let (mut surface, mut loader, mut queue) = setup(Increment::Fixed(1.0));
        let label = surface.query_one(selectors::STATUS_LABEL).unwrap().unwrap();
        let loader_el = surface.query_one(selectors::LOADER).unwrap().unwrap();
        loader.start(&mut surface, &mut queue).unwrap();
        assert_eq!(queue.active_count(), 3);

        let events = pump(&mut loader, &mut surface, &mut queue, ms(30_000));
        assert_eq!(
            events,
            vec![
                (ms(15_000), LoaderEvent::Completed),
                (ms(17_100), LoaderEvent::ContentRevealed),
            ]
        );
        assert_eq!(loader.progress_ticks(), 100);
        assert_eq!(loader.progress(), 100.0);
        assert!(!surface.is_attached(loader_el));
        assert_eq!(surface.text(label).unwrap(), "Welcome to Ozin Group Limited!");
        assert!(loader.coordinator().entrance_done());
        assert_eq!(queue.active_count(), 0);
        assert!(loader.is_quiescent(&queue));
    }

    #[test]
    fn test_startup_timers_inactive_after_completion() {
        let (mut surface, mut loader, mut queue) = setup(Increment::Fixed(25.0));
        let items = surface.query(selectors::HIGHLIGHT_ITEMS).unwrap();
        loader.start(&mut surface, &mut queue).unwrap();

        // 4 ticks at 150ms complete the bar; settle fires at 1400ms
        pump(&mut loader, &mut surface, &mut queue, ms(1400));
        assert_eq!(loader.stage(), CompletionStage::Exiting);
        assert!(loader.highlight_timer().is_none());
        assert!(loader.message_timer().is_none());
        assert!(!loader.rotator().is_running());
        assert!(loader.sequencer().is_finished());
        assert!(items.iter().all(|i| !surface.has_class(*i, classes::ACTIVE)));
    }

    #[test]
    fn test_extra_ticks_after_completion_change_nothing() {
        let (mut surface, mut loader, mut queue) = setup(Increment::Fixed(50.0));
        let label = surface.query_one(selectors::STATUS_LABEL).unwrap().unwrap();
        let items = surface.query(selectors::HIGHLIGHT_ITEMS).unwrap();
        loader.start(&mut surface, &mut queue).unwrap();
        pump(&mut loader, &mut surface, &mut queue, ms(10_000));
        assert!(loader.is_content_revealed());

        let text = surface.text(label).unwrap();
        for task in [
            LoaderTask::ProgressTick,
            LoaderTask::HighlightTick,
            LoaderTask::MessageTick,
            LoaderTask::Settle,
            LoaderTask::Completion(CompletionTask::Remove),
        ] {
            assert_eq!(loader.run(task, &mut surface, &mut queue).unwrap(), LoaderEvent::None);
        }
        assert_eq!(surface.text(label).unwrap(), text);
        assert!(items.iter().all(|i| !surface.has_class(*i, classes::ACTIVE)));
        assert_eq!(loader.coordinator().ignored_triggers(), 1);
        assert_eq!(loader.progress_ticks(), 2);
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_random_progress_monotone() {
        let (mut surface, mut loader, mut queue) = setup(Increment::random(1.0, 4.0, Some(42)));
        loader.start(&mut surface, &mut queue).unwrap();

        let mut prev = 0.0;
        while let Some((_, task)) = queue.pop_due(ms(20_000)) {
            loader.run(task, &mut surface, &mut queue).unwrap();
            assert!(loader.progress() >= prev);
            assert!(loader.progress() <= 100.0);
            prev = loader.progress();
        }
        assert!(loader.is_complete());
        assert!(loader.progress_ticks() <= 100);
    }

    #[test]
    fn test_teardown_midway_leaves_no_timers() {
        let (mut surface, mut loader, mut queue) = setup(Increment::Fixed(1.0));
        loader.start(&mut surface, &mut queue).unwrap();
        pump(&mut loader, &mut surface, &mut queue, ms(3000));
        loader.teardown(&mut queue);
        assert_eq!(queue.active_count(), 0);
        assert!(queue.pop_due(ms(60_000)).is_none());
    }

    #[test]
    fn test_empty_surface_still_completes() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let mut loader = LoaderSequence::new(&surface, &LoaderConfig::default())
            .unwrap()
            .with_increment(Increment::Fixed(20.0));
        let mut queue = TimerQueue::<LoaderTask>::new();
        loader.start(&mut surface, &mut queue).unwrap();

        let events = pump(&mut loader, &mut surface, &mut queue, ms(10_000));
        assert_eq!(events.len(), 2);
        assert!(loader.is_content_revealed());
    }
}
