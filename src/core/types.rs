//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};

/// Opaque identifier for actors. Handle 0 means "absent".
///
/// Handles are issued by a monotonically increasing counter in the actor
/// store and are never reused with a different identity within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorHandle(pub u32);

impl ActorHandle {
    pub const ABSENT: ActorHandle = ActorHandle(0);

    pub fn is_absent(&self) -> bool {
        self.0 == 0
    }
}

/// Simulation tick counter (authoritative time unit)
pub type Tick = u64;

/// Discrete grid position. Level changes are a distinct operation from
/// planar movement and carry their own cost model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub level: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, level: i32) -> Self {
        Self { x, y, level }
    }

    /// Chebyshev distance on the plane: `max(|dx|, |dy|)`
    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Manhattan distance on the plane: `|dx| + |dy|`
    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Planar translation, level unchanged
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.level)
    }
}

/// One-cell planar movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveVector {
    pub dx: i32,
    pub dy: i32,
}

impl MoveVector {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchOutcome {
    Pending,
    Accepted,
    Rejected,
}

/// Why a dispatch attempt was turned down
///
/// Rejections are normal simulation outcomes, not errors. Every code is
/// surfaced through the coordinator's per-tick summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchRejection {
    None,
    Stamina,
    Blocked,
    Duplicate,
}
