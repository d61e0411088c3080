//! Fixed-capacity ring buffer with most-recent-first addressing
//!
//! Shared by the transition log, the observation record history and the
//! moderator's summary archive. Oldest entries are silently overwritten
//! once the buffer is full.

/// Bounded ring buffer. `recent(0)` is the newest entry.
#[derive(Debug, Clone)]
pub struct Ring<T> {
    buf: Vec<T>,
    next: usize,
    capacity: usize,
}

impl<T> Ring<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            next: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append an entry, overwriting the oldest if full
    pub fn push(&mut self, value: T) {
        if self.buf.len() < self.capacity {
            self.buf.push(value);
        } else {
            self.buf[self.next] = value;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    /// Entry at `offset` steps back from the newest (0 = newest)
    pub fn recent(&self, offset: usize) -> Option<&T> {
        if offset >= self.buf.len() {
            return None;
        }
        // `next` always points one past the newest slot
        let idx = (self.next + self.capacity - 1 - offset) % self.capacity;
        Some(&self.buf[idx])
    }

    /// Mutable access to the newest entry
    pub fn recent_mut(&mut self, offset: usize) -> Option<&mut T> {
        if offset >= self.buf.len() {
            return None;
        }
        let idx = (self.next + self.capacity - 1 - offset) % self.capacity;
        Some(&mut self.buf[idx])
    }

    /// Entry at `index` in chronological order (0 = oldest retained)
    pub fn chronological(&self, index: usize) -> Option<&T> {
        if index >= self.buf.len() {
            return None;
        }
        self.recent(self.buf.len() - 1 - index)
    }
}
