//! Cooperative timer queue over virtual time
//!
//! The single event queue every component schedules on. Time only moves
//! when the driver pops due timers, so the whole engine can be stepped
//! deterministically in tests and paced by a real clock in the runtime.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Smallest interval period; zero periods would spin the queue
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled timeout or interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Timeout,
    Interval(Duration),
}

#[derive(Debug, Clone)]
struct Entry<T> {
    task: T,
    kind: TimerKind,
    deadline: Duration,
    seq: u64,
}

/// Timeouts and intervals keyed by [`TimerId`], fired in deadline order
///
/// Timers sharing a deadline fire in the order they were (re)scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    heap: BinaryHeap<Reverse<(Duration, u64, TimerId)>>,
    timers: HashMap<TimerId, Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            heap: BinaryHeap::new(),
            timers: HashMap::new(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once after `delay`
    pub fn set_timeout(&mut self, delay: Duration, task: T) -> TimerId {
        self.schedule(TimerKind::Timeout, delay, task)
    }

    /// Run `task` every `period`, first after one period
    pub fn set_interval(&mut self, period: Duration, task: T) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.schedule(TimerKind::Interval(period), period, task)
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        let seq = self.push(deadline, id);
        self.timers.insert(id, Entry { task, kind, deadline, seq });
        id
    }

    fn push(&mut self, deadline: Duration, id: TimerId) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((deadline, seq, id)));
        seq
    }

    /// Cancel a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    #[inline]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn kind(&self, id: TimerId) -> Option<TimerKind> {
        self.timers.get(&id).map(|e| e.kind)
    }

    /// Deadline of the earliest live timer
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_stale();
        self.heap.peek().map(|Reverse((deadline, _, _))| *deadline)
    }

    /// Pop the earliest timer due at or before `until`
    ///
    /// Advances the clock to the timer's deadline. Intervals are rescheduled
    /// one period after their deadline; timeouts are dropped.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        self.discard_stale();
        let Reverse((deadline, _, id)) = *self.heap.peek()?;
        if deadline > until {
            return None;
        }
        self.heap.pop();
        self.now = self.now.max(deadline);

        let kind = self.timers.get(&id)?.kind;
        match kind {
            TimerKind::Timeout => self.timers.remove(&id).map(|e| (id, e.task)),
            TimerKind::Interval(period) => {
                let next = deadline + period;
                let seq = self.push(next, id);
                let entry = self.timers.get_mut(&id)?;
                entry.deadline = next;
                entry.seq = seq;
                Some((id, entry.task.clone()))
            }
        }
    }

    /// Move the clock forward without firing anything
    pub fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    /// Cancel every timer
    pub fn clear(&mut self) {
        self.timers.clear();
        self.heap.clear();
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse((deadline, seq, id))) = self.heap.peek().copied() {
            match self.timers.get(&id) {
                Some(entry) if entry.deadline == deadline && entry.seq == seq => break,
                _ => {
                    self.heap.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(queue: &mut TimerQueue<&'static str>, until: Duration) -> Vec<(Duration, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, task)) = queue.pop_due(until) {
            fired.push((queue.now(), task));
        }
        queue.advance_clock(until);
        fired
    }

    #[test]
    fn test_timeouts_fire_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(ms(300), "late");
        queue.set_timeout(ms(100), "early");
        queue.set_timeout(ms(100), "early-second");

        let fired = drain(&mut queue, ms(1000));
        assert_eq!(
            fired,
            vec![(ms(100), "early"), (ms(100), "early-second"), (ms(300), "late")]
        );
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_interval_repeats_until_cancelled() {
        let mut queue = TimerQueue::new();
        let id = queue.set_interval(ms(150), "tick");

        assert_eq!(drain(&mut queue, ms(450)).len(), 3);
        assert!(queue.is_active(id));

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(drain(&mut queue, ms(2000)).is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_interleaved_periods() {
        let mut queue = TimerQueue::new();
        queue.set_interval(ms(150), "progress");
        queue.set_interval(ms(1000), "message");

        let fired = drain(&mut queue, ms(1000));
        let progress = fired.iter().filter(|(_, t)| *t == "progress").count();
        let message = fired.iter().filter(|(_, t)| *t == "message").count();
        assert_eq!(progress, 6);
        assert_eq!(message, 1);
    }

    #[test]
    fn test_timeout_scheduled_from_handler_uses_virtual_now() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(ms(100), "first");
        let (_, task) = queue.pop_due(ms(1000)).unwrap();
        assert_eq!(task, "first");
        queue.set_timeout(ms(50), "second");
        assert_eq!(queue.next_deadline(), Some(ms(150)));
    }

    #[test]
    fn test_zero_period_clamped() {
        let mut queue = TimerQueue::new();
        queue.set_interval(Duration::ZERO, "spin");
        assert_eq!(queue.next_deadline(), Some(MIN_PERIOD));
    }
}
