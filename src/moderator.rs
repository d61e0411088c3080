//! Moderator: bounded archive of per-tick summaries

use crate::core::ring::Ring;

pub struct Moderator {
    summaries: Ring<String>,
}

impl Moderator {
    pub fn new(capacity: usize) -> Self {
        Self {
            summaries: Ring::new(capacity),
        }
    }

    /// Accept one per-tick summary line from the coordinator
    pub fn report(&mut self, summary: String) {
        self.summaries.push(summary);
    }

    pub fn count(&self) -> usize {
        self.summaries.len()
    }

    /// Summary at `index` in chronological order (0 = oldest retained)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.summaries.chronological(index).map(|s| s.as_str())
    }

    /// The most recent summary
    pub fn latest(&self) -> Option<&str> {
        self.summaries.recent(0).map(|s| s.as_str())
    }
}
