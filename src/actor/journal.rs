//! Bounded transition log
//!
//! Every successful move, level shift or teleport appends an event here.
//! Capacity is fixed at 32; the oldest entry is silently overwritten.
//! Entries are addressed most-recent-first by offset.

use serde::{Deserialize, Serialize};

use crate::core::ring::Ring;
use crate::core::types::{Position, Tick};

/// Fixed log capacity. Observable: `recent(31)` of a long-running actor is
/// valid, `recent(32)` is None.
pub const JOURNAL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    PlanarMove,
    LevelShift,
    Teleport,
}

/// One committed state transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub kind: TransitionKind,
    pub from: Position,
    pub to: Position,
    pub stamina_spent: i32,
    /// Stamped by the dispatch layer on permit acceptance; the value at
    /// append time is provisional.
    pub tick: Tick,
}

#[derive(Debug, Clone)]
pub struct TransitionLog {
    events: Ring<TransitionEvent>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            events: Ring::new(JOURNAL_CAPACITY),
        }
    }

    pub fn record(&mut self, event: TransitionEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event `offset` steps back from the newest (0 = newest)
    pub fn recent(&self, offset: usize) -> Option<&TransitionEvent> {
        self.events.recent(offset)
    }

    /// Overwrite the newest event's tick stamp. The dispatch layer owns
    /// this timestamp, not the movement code that appended the event.
    pub fn stamp_latest(&mut self, tick: Tick) {
        if let Some(event) = self.events.recent_mut(0) {
            event.tick = tick;
        }
    }
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_event(x: i32, tick: Tick) -> TransitionEvent {
        TransitionEvent {
            kind: TransitionKind::PlanarMove,
            from: Position::new(x - 1, 0, 0),
            to: Position::new(x, 0, 0),
            stamina_spent: 4,
            tick,
        }
    }

    #[test]
    fn test_journal_recent_ordering() {
        let mut log = TransitionLog::new();
        log.record(step_event(1, 10));
        log.record(step_event(2, 11));
        assert_eq!(log.recent(0).unwrap().to.x, 2);
        assert_eq!(log.recent(1).unwrap().to.x, 1);
        assert!(log.recent(2).is_none());
    }

    #[test]
    fn test_journal_bound_after_overflow() {
        let mut log = TransitionLog::new();
        for i in 0..50 {
            log.record(step_event(i, i as Tick));
        }
        assert_eq!(log.len(), JOURNAL_CAPACITY);
        assert!(log.recent(31).is_some());
        assert!(log.recent(32).is_none());
        assert_eq!(log.recent(0).unwrap().to.x, 49);
        assert_eq!(log.recent(31).unwrap().to.x, 18);
    }

    #[test]
    fn test_stamp_latest_tick() {
        let mut log = TransitionLog::new();
        log.record(step_event(1, 0));
        log.stamp_latest(77);
        assert_eq!(log.recent(0).unwrap().tick, 77);
    }

    #[test]
    fn test_stamp_on_empty_is_noop() {
        let mut log = TransitionLog::new();
        log.stamp_latest(5);
        assert!(log.is_empty());
    }
}
