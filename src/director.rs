//! Deterministic intent generator
//!
//! A pure function of `(tick, handle, index)`. Each actor gets its own
//! wandering pattern that advances every tick, with no randomness source
//! beyond the triple itself: replays are bit-identical.

use crate::core::types::{ActorHandle, MoveVector, Tick};

/// Movement vector table. Order is load-bearing for reproducibility:
/// E, W, N, S, NE, NW, SW, SE, wait.
pub const VECTOR_TABLE: [(i32, i32); 9] = [
    (1, 0),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (1, 1),
    (0, 0),
];

/// Xorshift-style bit scramble, masked non-negative
pub fn scramble(value: u32) -> u32 {
    let mut v = value;
    v ^= v.wrapping_shl(13);
    v ^= v >> 17;
    v ^= v.wrapping_shl(5);
    v & 0x7fff_ffff
}

/// Compute the one-cell movement intent for an actor at a given tick
pub fn intent(tick: Tick, handle: ActorHandle, index: u32) -> MoveVector {
    let base_seed = scramble(handle.0.wrapping_shl(4) ^ index.wrapping_add(1));
    let slot = base_seed.wrapping_add(tick as u32) % VECTOR_TABLE.len() as u32;
    let (dx, dy) = VECTOR_TABLE[slot as usize];
    MoveVector::new(dx, dy)
}
