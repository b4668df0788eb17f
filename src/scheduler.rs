//! Timer scheduler
//!
//! A virtual clock with cancellable one-shot timers. Everything runs on the
//! caller's thread: the host advances the clock and the owner drains due
//! events one at a time, so a handler may schedule or cancel freely.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled timer, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// One-shot timers ordered by deadline, FIFO among equal deadlines
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), E>,
    deadlines: HashMap<u64, Duration>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `event` once `delay` has elapsed from now
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;

        let deadline = self.now + delay;
        self.queue.insert((deadline, id), event);
        self.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.queue.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its deadline
    pub fn next_due(&mut self, until: Duration) -> Option<E> {
        let (deadline, id) = *self.queue.keys().next()?;
        if deadline > until {
            return None;
        }

        let event = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        if deadline > self.now {
            self.now = deadline;
        }
        Some(event)
    }

    /// Move the clock forward; never backwards
    pub fn advance_to(&mut self, time: Duration) {
        if time > self.now {
            self.now = time;
        }
    }

    #[cfg(test)]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Cancel every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}
