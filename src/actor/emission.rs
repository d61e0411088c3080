//! Per-actor outbound messaging
//!
//! Two fixed-capacity FIFO queues: general messages (capacity 8) and
//! receipts (capacity 16). Enqueue on a full queue evicts the oldest entry
//! rather than rejecting; the drop is deliberate, not an error.

use serde::{Deserialize, Serialize};

use crate::core::types::ActorHandle;

/// Message queue capacity
pub const MESSAGE_CAPACITY: usize = 8;
/// Receipt queue capacity
pub const RECEIPT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Generic,
    Action,
    AdjacentRequest,
    AdjacentResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    pub from: ActorHandle,
    pub payload_a: i32,
    pub payload_b: i32,
    pub tag: i32,
    pub kind: MessageKind,
}

/// Bounded FIFO with drop-oldest overflow
#[derive(Debug, Clone)]
struct BoundedQueue {
    entries: Vec<Message>,
    capacity: usize,
}

impl BoundedQueue {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, message: Message) {
        if self.entries.len() >= self.capacity {
            self.entries.remove(0); // Drop oldest
        }
        self.entries.push(message);
    }

    /// Remove and return the first entry matching kind and tag,
    /// preserving the order of the rest
    fn take_by(&mut self, kind: MessageKind, tag: i32) -> Option<Message> {
        let idx = self
            .entries
            .iter()
            .position(|m| m.kind == kind && m.tag == tag)?;
        Some(self.entries.remove(idx))
    }

    fn take_by_kind(&mut self, kind: MessageKind) -> Option<Message> {
        let idx = self.entries.iter().position(|m| m.kind == kind)?;
        Some(self.entries.remove(idx))
    }
}

/// Emission state of one actor: outbound messages and receipts
#[derive(Debug, Clone)]
pub struct EmissionState {
    messages: BoundedQueue,
    receipts: BoundedQueue,
    next_id: i32,
}

impl EmissionState {
    pub fn new() -> Self {
        Self {
            messages: BoundedQueue::new(MESSAGE_CAPACITY),
            receipts: BoundedQueue::new(RECEIPT_CAPACITY),
            next_id: 1,
        }
    }

    fn issue_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enqueue an outbound message, evicting the oldest if full
    pub fn enqueue_message(
        &mut self,
        from: ActorHandle,
        kind: MessageKind,
        tag: i32,
        payload_a: i32,
        payload_b: i32,
    ) -> i32 {
        let id = self.issue_id();
        self.messages.push(Message { id, from, payload_a, payload_b, tag, kind });
        id
    }

    /// Enqueue a receipt, evicting the oldest if full
    pub fn enqueue_receipt(
        &mut self,
        from: ActorHandle,
        kind: MessageKind,
        tag: i32,
        payload_a: i32,
        payload_b: i32,
    ) -> i32 {
        let id = self.issue_id();
        self.receipts.push(Message { id, from, payload_a, payload_b, tag, kind });
        id
    }

    /// Remove the first message of the given kind and tag
    pub fn dequeue_message(&mut self, kind: MessageKind, tag: i32) -> Option<Message> {
        self.messages.take_by(kind, tag)
    }

    /// Remove the first message of the given kind, any tag
    pub fn dequeue_message_kind(&mut self, kind: MessageKind) -> Option<Message> {
        self.messages.take_by_kind(kind)
    }

    /// Remove the first receipt of the given kind and tag
    pub fn dequeue_receipt(&mut self, kind: MessageKind, tag: i32) -> Option<Message> {
        self.receipts.take_by(kind, tag)
    }

    pub fn message_count(&self) -> usize {
        self.messages.entries.len()
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.entries.len()
    }
}

impl Default for EmissionState {
    fn default() -> Self {
        Self::new()
    }
}
