use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::{ElementId, Surface};
use crate::Result;

/// Value at which loading is complete
pub const COMPLETE: f64 = 100.0;

/// The loader's completion percentage, owned by the progress simulator
///
/// Single-threaded by construction (`Rc<Cell<_>>`). Readers handed out via
/// [`LoadProgress::reader`] observe every write immediately.
#[derive(Debug, Default)]
pub struct LoadProgress {
    value: Rc<Cell<f64>>,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    pub fn reader(&self) -> ProgressReader {
        ProgressReader {
            value: Rc::clone(&self.value),
        }
    }

    /// Add `by`, clamped to [current, COMPLETE]; returns the new value
    fn advance(&self, by: f64) -> f64 {
        let current = self.value.get();
        let next = (current + by.max(0.0)).min(COMPLETE);
        self.value.set(next);
        next
    }
}

/// Read-only view of [`LoadProgress`]
#[derive(Debug, Clone)]
pub struct ProgressReader {
    value: Rc<Cell<f64>>,
}

impl ProgressReader {
    #[inline]
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.get() >= COMPLETE
    }
}

/// Source of per-tick increments
#[derive(Debug, Clone)]
pub enum Increment {
    /// Uniform in `[min, max]`
    Random { min: f64, max: f64, rng: StdRng },
    /// Always the same step
    Fixed(f64),
}

impl Increment {
    /// Uniform increments, reproducible when seeded
    pub fn random(min: f64, max: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::Random { min, max, rng }
    }

    /// Smallest increment this source can produce
    pub fn min(&self) -> f64 {
        match self {
            Self::Random { min, .. } => *min,
            Self::Fixed(step) => *step,
        }
    }

    fn next(&mut self) -> f64 {
        match self {
            Self::Random { min, max, rng } => {
                if max > min {
                    rng.random_range(*min..=*max)
                } else {
                    *min
                }
            }
            Self::Fixed(step) => *step,
        }
    }
}

/// Elements the simulator draws into; any may be absent
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressElements {
    pub fill: Option<ElementId>,
    pub percentage: Option<ElementId>,
    pub indicator: Option<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressStep {
    /// Progress moved and is still below 100
    Advanced(f64),
    /// This tick reached 100
    Completed,
    /// Already complete; the tick changed nothing
    Finished,
}

/// Advances a synthetic completion percentage
#[derive(Debug)]
pub struct ProgressSimulator {
    progress: LoadProgress,
    increment: Increment,
    indicator_max: f64,
    elements: ProgressElements,
    ticks: u32,
    finished: bool,
}

impl ProgressSimulator {
    pub fn new(increment: Increment, indicator_max: f64, elements: ProgressElements) -> Self {
        Self {
            progress: LoadProgress::new(),
            increment,
            indicator_max,
            elements,
            ticks: 0,
            finished: false,
        }
    }

    pub fn reader(&self) -> ProgressReader {
        self.progress.reader()
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.progress.get()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_increment(&mut self, increment: Increment) {
        self.increment = increment;
    }

    /// Upper bound on ticks needed to reach 100 from zero
    pub fn max_ticks(&self) -> u32 {
        let min = self.increment.min();
        if min <= 0.0 {
            return u32::MAX;
        }
        (COMPLETE / min).ceil() as u32
    }

    /// Advance the percentage by one increment
    pub fn tick(&mut self) -> ProgressStep {
        if self.finished {
            return ProgressStep::Finished;
        }
        self.ticks += 1;
        let value = self.progress.advance(self.increment.next());
        if value >= COMPLETE {
            self.finished = true;
            ProgressStep::Completed
        } else {
            ProgressStep::Advanced(value)
        }
    }

    /// Draw the bar width, numeric readout and indicator position
    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let value = self.value();
        if let Some(fill) = self.elements.fill {
            surface.set_style(fill, "width", &format!("{}%", value))?;
        }
        if let Some(percentage) = self.elements.percentage {
            surface.set_text(percentage, &(value.floor() as u32).to_string())?;
        }
        if let Some(indicator) = self.elements.indicator {
            let left = value.min(self.indicator_max);
            surface.set_style(indicator, "left", &format!("{}%", left))?;
        }
        Ok(())
    }
}
