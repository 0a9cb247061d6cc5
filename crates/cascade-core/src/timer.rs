//! Deterministic one-shot timer service.
//!
//! Cascade never reads the wall clock on its own: every operation takes an
//! explicit `now`, and expiry only happens inside
//! [`TimerService::process_expired`]. The host decides how time advances,
//! which makes debounce behavior (hover-intent delays, typeahead resets)
//! fully deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::TimerError;

new_key_type! {
    /// A unique identifier for a pending timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer fires.
    deadline: Instant,
    /// Whether this timer is still live.
    active: bool,
}

/// An entry in the timer queue (min-heap by deadline).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    deadline: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.deadline.cmp(&self.deadline)
    }
}

/// Manages all pending one-shot timers for a component tree.
pub struct TimerService {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending fires (min-heap by deadline).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerService {
    /// Create a new timer service with no pending timers.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Schedule a one-shot timer that fires `delay` after `now`.
    ///
    /// Returns the timer ID that can be used to cancel the timer before
    /// it fires.
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> TimerId {
        let deadline = now + delay;
        let id = self.timers.insert(TimerData {
            deadline,
            active: true,
        });
        self.queue.push(TimerQueueEntry { id, deadline });
        id
    }

    /// Cancel a pending timer.
    ///
    /// A cancelled timer is guaranteed never to be reported by
    /// [`process_expired`](Self::process_expired). Returns an error if the
    /// timer already fired or was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Result<(), TimerError> {
        if self.timers.remove(id).is_some() {
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId)
        }
    }

    /// Check if a timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.active)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    ///
    /// Returns `None` if there are no pending timers; `Duration::ZERO` if
    /// one is already due.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        // Drop cancelled entries from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if self.timers.get(entry.id).is_some_and(|t| t.active) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.deadline.saturating_duration_since(now))
    }

    /// Remove and return all timers whose deadline is at or before `now`.
    ///
    /// Fired timers are returned in deadline order and removed from the
    /// service; their IDs become invalid.
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.deadline > now {
                break;
            }

            let entry = *entry;
            self.queue.pop();

            // Skip entries whose timer was cancelled.
            if self.timers.remove(entry.id).is_none() {
                continue;
            }

            tracing::trace!(target: "cascade_core::timer", id = ?entry.id, "timer fired");
            fired.push(entry.id);
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.timers.iter().filter(|(_, t)| t.active).count()
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_at_deadline() {
        let mut service = TimerService::new();
        let t0 = Instant::now();

        let id = service.schedule(t0, ms(75));

        assert!(service.process_expired(t0 + ms(74)).is_empty());
        assert_eq!(service.process_expired(t0 + ms(75)), vec![id]);
        // One-shot: never fires again.
        assert!(service.process_expired(t0 + ms(200)).is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut service = TimerService::new();
        let t0 = Instant::now();

        let id = service.schedule(t0, ms(50));
        service.cancel(id).unwrap();

        assert!(!service.is_pending(id));
        assert!(service.process_expired(t0 + ms(100)).is_empty());
        assert_eq!(service.cancel(id), Err(TimerError::InvalidTimerId));
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut service = TimerService::new();
        let t0 = Instant::now();

        let late = service.schedule(t0, ms(100));
        let early = service.schedule(t0, ms(10));

        assert_eq!(service.process_expired(t0 + ms(150)), vec![early, late]);
    }

    #[test]
    fn time_until_next_skips_cancelled() {
        let mut service = TimerService::new();
        let t0 = Instant::now();

        let first = service.schedule(t0, ms(10));
        service.schedule(t0, ms(40));
        service.cancel(first).unwrap();

        assert_eq!(service.time_until_next(t0), Some(ms(40)));
        assert_eq!(service.time_until_next(t0 + ms(60)), Some(Duration::ZERO));
    }

    #[test]
    fn pending_count_tracks_lifecycle() {
        let mut service = TimerService::new();
        let t0 = Instant::now();

        let a = service.schedule(t0, ms(10));
        let _b = service.schedule(t0, ms(20));
        assert_eq!(service.pending_count(), 2);

        service.cancel(a).unwrap();
        assert_eq!(service.pending_count(), 1);

        service.process_expired(t0 + ms(30));
        assert_eq!(service.pending_count(), 0);
    }
}
