use crate::surface::{ElementId, Surface};
use crate::Result;

use super::progress::ProgressReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerStep {
    /// Displayed the message at this index
    Shown(usize),
    /// Queue exhausted before loading finished; last message stays up
    Waiting,
    /// Displayed the completion message on this tick
    Finished,
    /// Already finished
    Idle,
}

/// Steps the loader's status label through an ordered list of messages
#[derive(Debug)]
pub struct MessageSequencer {
    label: Option<ElementId>,
    messages: Vec<String>,
    completion: String,
    cursor: usize,
    finished: bool,
    progress: ProgressReader,
}

impl MessageSequencer {
    pub fn new(
        label: Option<ElementId>,
        messages: Vec<String>,
        completion: String,
        progress: ProgressReader,
    ) -> Self {
        Self {
            label,
            messages,
            completion,
            cursor: 0,
            finished: false,
            progress,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of queue messages shown so far
    pub fn shown(&self) -> usize {
        self.cursor
    }

    pub fn tick(&mut self, surface: &mut dyn Surface) -> Result<SequencerStep> {
        if self.finished {
            return Ok(SequencerStep::Idle);
        }
        if self.progress.is_complete() {
            self.finish(surface)?;
            return Ok(SequencerStep::Finished);
        }
        let Some(message) = self.messages.get(self.cursor) else {
            return Ok(SequencerStep::Waiting);
        };

        let index = self.cursor;
        self.cursor += 1;
        if let Some(label) = self.label {
            surface.set_text(label, message)?;
        }
        Ok(SequencerStep::Shown(index))
    }

    /// Show the completion message; returns false if it was already shown
    pub fn finish(&mut self, surface: &mut dyn Surface) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        self.finished = true;
        if let Some(label) = self.label {
            surface.set_text(label, &self.completion)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::progress::{Increment, ProgressElements, ProgressSimulator};
    use crate::surface::{landing_page, selectors};

    fn messages() -> Vec<String> {
        vec!["one".to_string(), "two".to_string()]
    }

    #[test]
    fn test_steps_then_waits_then_completes() {
        let mut surface = landing_page(1280.0, 800.0);
        let label = surface.query_one(selectors::STATUS_LABEL).unwrap();
        let mut sim =
            ProgressSimulator::new(Increment::Fixed(50.0), 95.0, ProgressElements::default());
        let mut seq = MessageSequencer::new(label, messages(), "done".to_string(), sim.reader());

        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Shown(0));
        assert_eq!(surface.text(label.unwrap()).unwrap(), "one");
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Shown(1));
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Waiting);
        assert_eq!(surface.text(label.unwrap()).unwrap(), "two");

        sim.tick();
        sim.tick();
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Finished);
        assert_eq!(surface.text(label.unwrap()).unwrap(), "done");
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Idle);
    }

    #[test]
    fn test_completion_preempts_remaining_messages() {
        let mut surface = landing_page(1280.0, 800.0);
        let label = surface.query_one(selectors::STATUS_LABEL).unwrap();
        let mut sim =
            ProgressSimulator::new(Increment::Fixed(100.0), 95.0, ProgressElements::default());
        let mut seq = MessageSequencer::new(label, messages(), "done".to_string(), sim.reader());

        sim.tick();
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Finished);
        assert_eq!(seq.shown(), 0);
        assert_eq!(surface.text(label.unwrap()).unwrap(), "done");
    }

    #[test]
    fn test_finish_is_terminal_and_shown_once() {
        let mut surface = landing_page(1280.0, 800.0);
        let label = surface.query_one(selectors::STATUS_LABEL).unwrap().unwrap();
        let sim = ProgressSimulator::new(Increment::Fixed(1.0), 95.0, ProgressElements::default());
        let mut seq =
            MessageSequencer::new(Some(label), messages(), "done".to_string(), sim.reader());

        assert!(seq.finish(&mut surface).unwrap());
        surface.set_text(label, "overwritten").unwrap();
        assert!(!seq.finish(&mut surface).unwrap());
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Idle);
        assert_eq!(surface.text(label).unwrap(), "overwritten");
    }

    #[test]
    fn test_missing_label_is_noop() {
        let mut surface = landing_page(1280.0, 800.0);
        let sim = ProgressSimulator::new(Increment::Fixed(1.0), 95.0, ProgressElements::default());
        let mut seq = MessageSequencer::new(None, messages(), "done".to_string(), sim.reader());
        assert_eq!(seq.tick(&mut surface).unwrap(), SequencerStep::Shown(0));
    }
}
