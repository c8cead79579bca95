use crate::surface::{classes, ElementId, Surface};
use crate::Result;

use super::progress::ProgressReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorStep {
    Rotated { from: usize, to: usize },
    /// Fewer than two items; nothing to rotate
    Held,
    /// Loading finished on this tick; all items deactivated
    Stopped,
    /// Not running
    Idle,
}

/// Cycles the `active` flag across the loader's feature highlights
///
/// Exactly one item is active while running and none once stopped.
#[derive(Debug)]
pub struct HighlightRotator {
    items: Vec<ElementId>,
    index: usize,
    running: bool,
    progress: ProgressReader,
}

impl HighlightRotator {
    pub fn new(items: Vec<ElementId>, progress: ProgressReader) -> Self {
        Self {
            items,
            index: 0,
            running: false,
            progress,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_index(&self) -> Option<usize> {
        (self.running && !self.items.is_empty()).then_some(self.index)
    }

    /// Activate the first item and deactivate the rest
    pub fn start(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.running = true;
        self.index = 0;
        for (i, item) in self.items.iter().enumerate() {
            surface.set_class(*item, classes::ACTIVE, i == 0)?;
        }
        Ok(())
    }

    pub fn tick(&mut self, surface: &mut dyn Surface) -> Result<RotatorStep> {
        if !self.running {
            return Ok(RotatorStep::Idle);
        }
        if self.progress.is_complete() {
            self.stop(surface)?;
            return Ok(RotatorStep::Stopped);
        }
        if self.items.len() < 2 {
            return Ok(RotatorStep::Held);
        }

        let from = self.index;
        let to = (from + 1) % self.items.len();
        self.index = to;
        surface.set_class(self.items[from], classes::ACTIVE, false)?;
        surface.set_class(self.items[to], classes::ACTIVE, true)?;
        Ok(RotatorStep::Rotated { from, to })
    }

    /// Stop rotating and clear every active flag; returns false if already stopped
    pub fn stop(&mut self, surface: &mut dyn Surface) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }
        self.running = false;
        for item in &self.items {
            surface.set_class(*item, classes::ACTIVE, false)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::progress::{Increment, ProgressElements, ProgressSimulator};
    use crate::surface::{landing_page, selectors, MemorySurface};

    fn active_count(surface: &MemorySurface, items: &[ElementId]) -> usize {
        items.iter().filter(|i| surface.has_class(**i, classes::ACTIVE)).count()
    }

    #[test]
    fn test_rotation_wraps_with_one_active() {
        let mut surface = landing_page(1280.0, 800.0);
        let items = surface.query(selectors::HIGHLIGHT_ITEMS).unwrap();
        let sim = ProgressSimulator::new(Increment::Fixed(1.0), 95.0, ProgressElements::default());
        let mut rotator = HighlightRotator::new(items.clone(), sim.reader());

        rotator.start(&mut surface).unwrap();
        assert_eq!(active_count(&surface, &items), 1);

        let mut seen = Vec::new();
        for _ in 0..5 {
            match rotator.tick(&mut surface).unwrap() {
                RotatorStep::Rotated { to, .. } => seen.push(to),
                other => panic!("unexpected {:?}", other),
            }
            assert_eq!(active_count(&surface, &items), 1);
        }
        assert_eq!(seen, vec![1, 2, 3, 0, 1]);
        assert!(surface.has_class(items[1], classes::ACTIVE));
    }

    #[test]
    fn test_stops_once_progress_complete() {
        let mut surface = landing_page(1280.0, 800.0);
        let items = surface.query(selectors::HIGHLIGHT_ITEMS).unwrap();
        let mut sim =
            ProgressSimulator::new(Increment::Fixed(100.0), 95.0, ProgressElements::default());
        let mut rotator = HighlightRotator::new(items.clone(), sim.reader());
        rotator.start(&mut surface).unwrap();

        sim.tick();
        assert_eq!(rotator.tick(&mut surface).unwrap(), RotatorStep::Stopped);
        assert_eq!(active_count(&surface, &items), 0);
        assert!(!rotator.is_running());

        // Further ticks are inert
        assert_eq!(rotator.tick(&mut surface).unwrap(), RotatorStep::Idle);
        assert_eq!(active_count(&surface, &items), 0);
        assert!(!rotator.stop(&mut surface).unwrap());
    }

    #[test]
    fn test_short_lists_do_not_rotate() {
        let mut surface = landing_page(1280.0, 800.0);
        let sim = ProgressSimulator::new(Increment::Fixed(1.0), 95.0, ProgressElements::default());

        let mut empty = HighlightRotator::new(Vec::new(), sim.reader());
        empty.start(&mut surface).unwrap();
        assert_eq!(empty.tick(&mut surface).unwrap(), RotatorStep::Held);
        assert_eq!(empty.active_index(), None);

        let single = surface.query(selectors::HIGHLIGHT_ITEMS).unwrap()[..1].to_vec();
        let mut one = HighlightRotator::new(single.clone(), sim.reader());
        one.start(&mut surface).unwrap();
        assert_eq!(one.tick(&mut surface).unwrap(), RotatorStep::Held);
        assert!(surface.has_class(single[0], classes::ACTIVE));
    }
}
