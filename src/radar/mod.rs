//! Radar-style observation subsystem
//!
//! Each tick an actor with radar range >= 1 scans every registered actor on
//! its own level and keeps the nearest neighbor in each of 8 compass
//! octants. Octant winners become Observed slots with a synthesized record;
//! octants that lose their winner are reset only if the slot was filled by
//! the radar itself (negative request id). Externally issued interrogations
//! carry positive ids and are never clobbered by the automatic sweep.

use serde::{Deserialize, Serialize};

use crate::actor::resources::{Occupancy, ResourceTriple};
use crate::core::ring::Ring;
use crate::core::types::{ActorHandle, Position, Tick};

/// Observation record history capacity
pub const RECORD_CAPACITY: usize = 32;
/// Default history window: Pending interrogations older than this many
/// ticks are marked NoResponse by the sweep
pub const DEFAULT_WINDOW: u64 = 1;

/// What an observer is allowed to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadarCapability {
    Basic,
    /// Enhanced observers also capture the observed actor's stamina triple
    Enhanced,
}

/// The 8 compass octants, in the canonical order shared with the
/// director's vector table: E, W, N, S, NE, NW, SW, SE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(usize)]
pub enum Octant {
    East = 0,
    West = 1,
    North = 2,
    South = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthWest = 6,
    SouthEast = 7,
}

pub const OCTANT_COUNT: usize = 8;

impl Octant {
    pub const ALL: [Octant; OCTANT_COUNT] = [
        Octant::East,
        Octant::West,
        Octant::North,
        Octant::South,
        Octant::NorthEast,
        Octant::NorthWest,
        Octant::SouthWest,
        Octant::SouthEast,
    ];

    /// Classify a non-zero delta by sign pattern. Pure horizontal or
    /// vertical only when one axis is exactly zero; diagonal quadrants
    /// otherwise. `(0, 0)` is unclassifiable.
    pub fn classify(dx: i32, dy: i32) -> Option<Octant> {
        match (dx.signum(), dy.signum()) {
            (0, 0) => None,
            (1, 0) => Some(Octant::East),
            (-1, 0) => Some(Octant::West),
            (0, -1) => Some(Octant::North),
            (0, 1) => Some(Octant::South),
            (1, -1) => Some(Octant::NorthEast),
            (-1, -1) => Some(Octant::NorthWest),
            (-1, 1) => Some(Octant::SouthWest),
            (1, 1) => Some(Octant::SouthEast),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Octant> {
        Octant::ALL.get(index).copied()
    }
}

/// Immutable snapshot of one interrogation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub observer: ActorHandle,
    pub observed: ActorHandle,
    pub position: Position,
    pub tick: Tick,
    pub occupancy: Occupancy,
    /// Present only when the observer's capability is Enhanced
    pub stamina: Option<ResourceTriple>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Unknown,
    Pending,
    NoResponse,
    Observed,
}

/// One adjacent-direction slot
#[derive(Debug, Clone, Copy)]
pub struct AdjacentSlot {
    pub status: SlotStatus,
    /// Negative: assigned by the radar sweep. Positive: externally issued
    /// interrogation. Zero: empty.
    pub request_id: i32,
    pub requested_tick: Tick,
    pub observed: ActorHandle,
    pub record: Option<ObservationRecord>,
}

impl AdjacentSlot {
    fn empty() -> Self {
        Self {
            status: SlotStatus::Unknown,
            request_id: 0,
            requested_tick: 0,
            observed: ActorHandle::ABSENT,
            record: None,
        }
    }
}

/// What the sweep sees of one registered actor
#[derive(Debug, Clone, Copy)]
pub struct RadarContact {
    pub handle: ActorHandle,
    pub position: Position,
    pub occupancy: Occupancy,
    pub stamina: ResourceTriple,
}

/// Per-actor observation state
#[derive(Debug, Clone)]
pub struct ObservationState {
    pub capability: RadarCapability,
    /// Chebyshev scan range; below 1 disables the sweep
    pub range: i32,
    window: u64,
    records: Ring<ObservationRecord>,
    slots: [AdjacentSlot; OCTANT_COUNT],
    /// Radar request ids count down from -1, independent of the positive
    /// external id space
    next_radar_id: i32,
}

impl ObservationState {
    pub fn new(capability: RadarCapability, range: i32) -> Self {
        Self {
            capability,
            range,
            window: DEFAULT_WINDOW,
            records: Ring::new(RECORD_CAPACITY),
            slots: [AdjacentSlot::empty(); OCTANT_COUNT],
            next_radar_id: -1,
        }
    }

    pub fn with_window(mut self, window: u64) -> Self {
        self.window = window;
        self
    }

    pub fn set_window(&mut self, window: u64) {
        self.window = window;
    }

    pub fn slot(&self, octant: Octant) -> &AdjacentSlot {
        &self.slots[octant.index()]
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn recent_record(&self, offset: usize) -> Option<&ObservationRecord> {
        self.records.recent(offset)
    }

    fn issue_radar_id(&mut self) -> i32 {
        let id = self.next_radar_id;
        self.next_radar_id -= 1;
        id
    }

    /// Explicitly interrogate one octant with an externally assigned
    /// positive request id. The slot goes Pending until the sweep either
    /// observes a neighbor there or the window elapses.
    pub fn interrogate(&mut self, octant: Octant, request_id: i32, tick: Tick) {
        debug_assert!(request_id > 0);
        let slot = &mut self.slots[octant.index()];
        slot.status = SlotStatus::Pending;
        slot.request_id = request_id;
        slot.requested_tick = tick;
        slot.observed = ActorHandle::ABSENT;
        slot.record = None;
    }

    /// Run the automatic sweep over the registry snapshot
    pub fn sweep(
        &mut self,
        observer: ActorHandle,
        origin: Position,
        contacts: &[RadarContact],
        tick: Tick,
    ) {
        if self.range < 1 {
            return;
        }

        let mut winners: [Option<(i32, RadarContact)>; OCTANT_COUNT] = [None; OCTANT_COUNT];

        for contact in contacts {
            if contact.handle == observer {
                continue;
            }
            if contact.position.level != origin.level {
                continue;
            }
            let distance = origin.chebyshev(&contact.position);
            if distance == 0 || distance > self.range {
                continue;
            }
            let dx = contact.position.x - origin.x;
            let dy = contact.position.y - origin.y;
            let Some(octant) = Octant::classify(dx, dy) else {
                continue;
            };

            let slot = &mut winners[octant.index()];
            // Strictly nearer replaces; ties keep the earlier contact
            match slot {
                Some((best, _)) if distance >= *best => {}
                _ => *slot = Some((distance, *contact)),
            }
        }

        for octant in Octant::ALL {
            let idx = octant.index();
            match winners[idx] {
                Some((_, contact)) => {
                    let record = ObservationRecord {
                        observer,
                        observed: contact.handle,
                        position: contact.position,
                        tick,
                        occupancy: contact.occupancy,
                        stamina: match self.capability {
                            RadarCapability::Enhanced => Some(contact.stamina),
                            RadarCapability::Basic => None,
                        },
                    };
                    self.records.push(record);

                    let id = self.issue_radar_id();
                    let slot = &mut self.slots[idx];
                    slot.status = SlotStatus::Observed;
                    slot.request_id = id;
                    slot.requested_tick = tick;
                    slot.observed = contact.handle;
                    slot.record = Some(record);
                }
                None => {
                    let window = self.window;
                    let slot = &mut self.slots[idx];
                    if slot.request_id < 0 {
                        // Radar-owned slot: forget the stale observation
                        *slot = AdjacentSlot::empty();
                    } else if slot.request_id > 0
                        && slot.status == SlotStatus::Pending
                        && tick > slot.requested_tick + window
                    {
                        slot.status = SlotStatus::NoResponse;
                    }
                    // Positive ids are otherwise left untouched
                }
            }
        }
    }
}
