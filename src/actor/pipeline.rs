//! Per-actor tick pipeline
//!
//! Five ordered sub-steps run for every actor every tick:
//! introspection -> observation -> evaluation -> transition -> emission.
//! Each step operates on one actor's context plus a shared contact
//! snapshot of the registry; movement itself is adjudicated later by the
//! coordinator.

use crate::actor::context::ActorContext;
use crate::actor::emission::MessageKind;
use crate::actor::resources::Occupancy;
use crate::core::types::Tick;
use crate::director::VECTOR_TABLE;
use crate::radar::{Octant, RadarContact, SlotStatus};

/// Integer encoding of a slot status for message payloads
pub fn slot_status_code(status: SlotStatus) -> i32 {
    match status {
        SlotStatus::Unknown => 0,
        SlotStatus::Pending => 1,
        SlotStatus::NoResponse => 2,
        SlotStatus::Observed => 3,
    }
}

/// Run all five phases for one actor
pub fn run_actor_tick(
    ctx: &mut ActorContext,
    contacts: &[RadarContact],
    cultivating: bool,
    tick: Tick,
) {
    introspection(ctx, tick);
    observation(ctx, contacts, tick);
    evaluation(ctx);
    transition(ctx, cultivating);
    emission(ctx);
}

/// Phase 1: refresh the derived snapshot
fn introspection(ctx: &mut ActorContext, tick: Tick) {
    ctx.introspect(tick);
}

/// Phase 2: radar sweep over the shared registry snapshot
fn observation(ctx: &mut ActorContext, contacts: &[RadarContact], tick: Tick) {
    let handle = ctx.handle();
    let origin = ctx.position();
    ctx.observation.sweep(handle, origin, contacts, tick);
}

/// Phase 3: rebuild movement candidates
///
/// The eight compass unit moves are registered in the canonical table
/// order. A candidate is blocked when this tick's sweep observed a
/// Blocking neighbor on the exact target cell.
fn evaluation(ctx: &mut ActorContext) {
    let origin = ctx.position();

    let mut blocked_flags = [false; 8];
    for (i, (dx, dy)) in VECTOR_TABLE[..8].iter().enumerate() {
        let target = origin.offset(*dx, *dy);
        let octant = Octant::from_index(i).expect("octant table has 8 entries");
        let slot = ctx.observation.slot(octant);
        if slot.status == SlotStatus::Observed {
            if let Some(record) = slot.record {
                blocked_flags[i] =
                    record.position == target && record.occupancy == Occupancy::Blocking;
            }
        }
    }

    ctx.evaluation.reset();
    for (i, (dx, dy)) in VECTOR_TABLE[..8].iter().enumerate() {
        ctx.evaluation.register(*dx, *dy, blocked_flags[i]);
    }
    ctx.evaluation.rebuild(origin);
}

/// Phase 4: stationary state transitions
fn transition(ctx: &mut ActorContext, cultivating: bool) {
    if cultivating {
        ctx.resources.cultivate_tick();
    }
}

/// Phase 5: answer queued adjacent-requests with receipts carrying the
/// matching radar slot's status and observed handle
fn emission(ctx: &mut ActorContext) {
    let from = ctx.handle();
    while let Some(request) = ctx.emission.dequeue_message_kind(MessageKind::AdjacentRequest) {
        let (observed, status) = match Octant::from_index(request.tag as usize) {
            Some(octant) => {
                let slot = ctx.observation.slot(octant);
                (slot.observed.0 as i32, slot_status_code(slot.status))
            }
            None => (0, slot_status_code(SlotStatus::Unknown)),
        };
        ctx.emission.enqueue_receipt(
            from,
            MessageKind::AdjacentResponse,
            request.tag,
            observed,
            status,
        );
    }
}
