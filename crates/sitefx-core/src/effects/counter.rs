use std::time::Duration;

use tracing::debug;

use crate::config::CounterConfig;
use crate::surface::{selectors, ElementId, Surface};
use crate::timer::{TimerId, TimerQueue};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    /// Waiting to become visible
    Observing,
    Running,
    Done,
    /// Text was not a number; left untouched
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStep {
    /// Displayed this value and keeps going
    Counting(i64),
    /// Reached the target on this step
    Finished(i64),
    /// Not running
    Idle,
}

#[derive(Debug)]
struct Counter {
    id: ElementId,
    state: CounterState,
    target: i64,
    current: f64,
    step: f64,
    timer: Option<TimerId>,
}

/// Counts `.stat-number` elements up from zero once they scroll into view
///
/// Each counter fires at most once: it is disconnected from observation the
/// first time its visible fraction reaches the threshold.
#[derive(Debug)]
pub struct CounterAnimator {
    counters: Vec<Counter>,
    threshold: f64,
    duration: Duration,
    step_period: Duration,
}

impl CounterAnimator {
    pub fn new(surface: &dyn Surface, config: &CounterConfig) -> Result<Self> {
        let counters = surface
            .query(selectors::COUNTERS)?
            .into_iter()
            .map(|id| Counter {
                id,
                state: CounterState::Observing,
                target: 0,
                current: 0.0,
                step: 0.0,
                timer: None,
            })
            .collect();
        Ok(Self {
            counters,
            threshold: config.visibility_threshold,
            duration: Duration::from_millis(config.duration_ms),
            step_period: Duration::from_millis(config.step_ms.max(1)),
        })
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<CounterState> {
        self.counters.get(index).map(|c| c.state)
    }

    pub fn element(&self, index: usize) -> Option<ElementId> {
        self.counters.get(index).map(|c| c.id)
    }

    /// Any counter still waiting to be seen
    pub fn is_observing(&self) -> bool {
        self.counters.iter().any(|c| c.state == CounterState::Observing)
    }

    /// Start every observed counter that is now visible enough
    ///
    /// `task` builds the queue item for a counter's step timer. Returns how
    /// many counters started.
    pub fn observe<T, F>(&mut self, surface: &dyn Surface, queue: &mut TimerQueue<T>, task: F) -> Result<usize>
    where
        T: Clone,
        F: Fn(usize) -> T,
    {
        let viewport = surface.viewport();
        let mut started = 0;
        for (index, counter) in self.counters.iter_mut().enumerate() {
            if counter.state != CounterState::Observing || !surface.is_attached(counter.id) {
                continue;
            }
            let ratio = viewport.visible_ratio(&surface.bounding_box(counter.id)?);
            if ratio < self.threshold {
                continue;
            }

            let text = surface.text(counter.id)?;
            let Ok(target) = text.trim().parse::<i64>() else {
                debug!(text = %text, "Counter text is not a number, skipping");
                counter.state = CounterState::Skipped;
                continue;
            };
            counter.state = CounterState::Running;
            counter.target = target;
            counter.current = 0.0;
            counter.step = step_size(target, self.duration, self.step_period);
            counter.timer = Some(queue.set_interval(self.step_period, task(index)));
            started += 1;
            debug!(target, step = counter.step, "Counter started");
        }
        Ok(started)
    }

    /// Advance one counter by its step
    pub fn step<T: Clone>(
        &mut self,
        index: usize,
        surface: &mut dyn Surface,
        queue: &mut TimerQueue<T>,
    ) -> Result<CounterStep> {
        let Some(counter) = self.counters.get_mut(index) else {
            return Ok(CounterStep::Idle);
        };
        if counter.state == CounterState::Running && !surface.is_attached(counter.id) {
            counter.state = CounterState::Done;
        }
        if counter.state != CounterState::Running {
            if let Some(id) = counter.timer.take() {
                queue.cancel(id);
            }
            return Ok(CounterStep::Idle);
        }

        counter.current += counter.step;
        let target = counter.target as f64;
        let done = if counter.step >= 0.0 {
            counter.current >= target
        } else {
            counter.current <= target
        };
        if done {
            counter.current = target;
            counter.state = CounterState::Done;
            if let Some(id) = counter.timer.take() {
                queue.cancel(id);
            }
        }

        let shown = counter.current.floor() as i64;
        surface.set_text(counter.id, &shown.to_string())?;
        Ok(if done {
            CounterStep::Finished(shown)
        } else {
            CounterStep::Counting(shown)
        })
    }

    /// Cancel every running counter's timer
    pub fn teardown<T: Clone>(&mut self, queue: &mut TimerQueue<T>) {
        for counter in &mut self.counters {
            if let Some(id) = counter.timer.take() {
                queue.cancel(id);
            }
        }
    }
}

/// Per-step increment so the count spans `duration`
pub fn step_size(target: i64, duration: Duration, step_period: Duration) -> f64 {
    let steps = duration.as_millis() as f64 / step_period.as_millis().max(1) as f64;
    if steps <= 0.0 {
        return target as f64;
    }
    target as f64 / steps
}
