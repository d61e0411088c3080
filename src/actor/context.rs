//! Per-actor state and the dispatch-permit entry point
//!
//! The context owns everything behind an actor handle: resources,
//! position, the bounded transition log, and the observation, evaluation
//! and emission sub-states the pipeline drives each tick.

use serde::{Deserialize, Serialize};

use crate::actor::evaluation::EvaluationState;
use crate::actor::emission::EmissionState;
use crate::actor::journal::{TransitionEvent, TransitionKind, TransitionLog};
use crate::actor::resources::{
    classify_occupancy, level_move_cost, planar_move_cost, ActorArchetype, Occupancy,
    ResourceSet, RESOURCE_INFINITY,
};
use crate::core::types::{ActorHandle, DispatchOutcome, DispatchRejection, Position, Tick};
use crate::director::scramble;
use crate::radar::{ObservationState, RadarCapability};

/// Why a movement attempt failed. Failures leave the actor untouched:
/// no position change, no stamina spend, no log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFailure {
    /// Not enough stamina for the computed cost
    InsufficientStamina,
    /// Cost came out RESOURCE_INFINITY; the move is uncomputable
    Uncomputable,
}

/// Result of one dispatch-permit call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitVerdict {
    pub outcome: DispatchOutcome,
    pub rejection: DispatchRejection,
}

impl PermitVerdict {
    fn accepted() -> Self {
        Self {
            outcome: DispatchOutcome::Accepted,
            rejection: DispatchRejection::None,
        }
    }

    fn rejected(rejection: DispatchRejection) -> Self {
        Self {
            outcome: DispatchOutcome::Rejected,
            rejection,
        }
    }
}

/// Derived per-tick snapshot refreshed by the introspection phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntrospectionState {
    pub occupancy: Occupancy,
    pub stamina_depleted: bool,
    pub health_depleted: bool,
    pub mana_depleted: bool,
    pub tick: Tick,
}

/// All state behind one actor handle
#[derive(Debug, Clone)]
pub struct ActorContext {
    handle: ActorHandle,
    /// Derived once from the handle at creation; never re-derived
    identity: u32,
    pub archetype: ActorArchetype,
    position: Position,
    pub resources: ResourceSet,
    journal: TransitionLog,
    pub observation: ObservationState,
    pub evaluation: EvaluationState,
    pub emission: EmissionState,
    pub introspection: Option<IntrospectionState>,
    // Dispatch-guard fields
    last_accepted_tick: Option<Tick>,
    pub last_rejection: DispatchRejection,
    pub last_tier: i32,
}

impl ActorContext {
    pub fn new(
        handle: ActorHandle,
        archetype: ActorArchetype,
        position: Position,
        radar_range: i32,
        bounds: (i32, i32),
    ) -> Self {
        let capability = match archetype {
            ActorArchetype::Mobile => RadarCapability::Enhanced,
            ActorArchetype::StaticTile => RadarCapability::Basic,
        };
        let range = match archetype {
            ActorArchetype::Mobile => radar_range,
            // Static tiles do not scan
            ActorArchetype::StaticTile => 0,
        };
        Self {
            handle,
            identity: scramble(handle.0),
            archetype,
            position,
            resources: archetype.default_resources(),
            journal: TransitionLog::new(),
            observation: ObservationState::new(capability, range),
            evaluation: EvaluationState::new(bounds.0, bounds.1),
            emission: EmissionState::new(),
            introspection: None,
            last_accepted_tick: None,
            last_rejection: DispatchRejection::None,
            last_tier: 0,
        }
    }

    pub fn handle(&self) -> ActorHandle {
        self.handle
    }

    pub fn identity(&self) -> u32 {
        self.identity
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn level(&self) -> i32 {
        self.position.level
    }

    pub fn last_accepted_tick(&self) -> Option<Tick> {
        self.last_accepted_tick
    }

    pub fn journal(&self) -> &TransitionLog {
        &self.journal
    }

    /// Structural occupancy classification of the current resources
    pub fn occupancy(&self) -> Occupancy {
        classify_occupancy(&self.resources)
    }

    /// Refresh the introspection snapshot for this tick
    pub fn introspect(&mut self, tick: Tick) {
        self.introspection = Some(IntrospectionState {
            occupancy: self.occupancy(),
            stamina_depleted: self.resources.stamina.max > 0 && self.resources.stamina.current == 0,
            health_depleted: self.resources.health.max > 0 && self.resources.health.current == 0,
            mana_depleted: self.resources.mana.max > 0 && self.resources.mana.current == 0,
            tick,
        });
    }

    /// Attempt a planar move, paying the stamina cost
    pub fn move_by(&mut self, dx: i32, dy: i32) -> Result<i32, MoveFailure> {
        let cost = planar_move_cost(self.resources.stamina.max, dx, dy);
        self.commit_move(
            TransitionKind::PlanarMove,
            self.position.offset(dx, dy),
            cost,
        )
    }

    /// Attempt a level change. Ascending and descending carry their own
    /// multipliers; planar coordinates are untouched.
    pub fn move_level_by(&mut self, dz: i32) -> Result<i32, MoveFailure> {
        let cost = level_move_cost(self.resources.stamina.max, dz);
        let mut target = self.position;
        target.level += dz;
        self.commit_move(TransitionKind::LevelShift, target, cost)
    }

    /// Authoritative placement; free, always succeeds, still logged
    pub fn teleport_to(&mut self, x: i32, y: i32, level: i32) {
        let from = self.position;
        self.position = Position::new(x, y, level);
        self.journal.record(TransitionEvent {
            kind: TransitionKind::Teleport,
            from,
            to: self.position,
            stamina_spent: 0,
            tick: 0,
        });
    }

    fn commit_move(
        &mut self,
        kind: TransitionKind,
        target: Position,
        cost: i32,
    ) -> Result<i32, MoveFailure> {
        if cost == RESOURCE_INFINITY {
            return Err(MoveFailure::Uncomputable);
        }
        if !self.resources.stamina.spend(cost) {
            return Err(MoveFailure::InsufficientStamina);
        }
        let from = self.position;
        self.position = target;
        self.journal.record(TransitionEvent {
            kind,
            from,
            to: target,
            stamina_spent: cost,
            tick: 0,
        });
        Ok(cost)
    }

    /// Dispatch-permit entry point
    ///
    /// Ticks must be strictly increasing per actor; a repeat or rewind is
    /// rejected Duplicate before anything else is considered. A zero-delta
    /// permit is always accepted at no cost. On acceptance the newest
    /// transition-log entry is stamped with the permit's tick: the
    /// timestamp belongs to the dispatch layer.
    pub fn apply_permit(&mut self, tick: Tick, dx: i32, dy: i32, tier: i32) -> PermitVerdict {
        if let Some(last) = self.last_accepted_tick {
            if tick <= last {
                self.last_rejection = DispatchRejection::Duplicate;
                return PermitVerdict::rejected(DispatchRejection::Duplicate);
            }
        }

        if dx == 0 && dy == 0 {
            self.last_accepted_tick = Some(tick);
            self.last_tier = tier;
            self.last_rejection = DispatchRejection::None;
            return PermitVerdict::accepted();
        }

        match self.move_by(dx, dy) {
            Ok(_) => {
                self.journal.stamp_latest(tick);
                self.last_accepted_tick = Some(tick);
                self.last_tier = tier;
                self.last_rejection = DispatchRejection::None;
                PermitVerdict::accepted()
            }
            Err(_) => {
                self.last_rejection = DispatchRejection::Stamina;
                PermitVerdict::rejected(DispatchRejection::Stamina)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mobile_at(x: i32, y: i32) -> ActorContext {
        ActorContext::new(
            ActorHandle(1),
            ActorArchetype::Mobile,
            Position::new(x, y, 0),
            6,
            (64, 64),
        )
    }

    #[test]
    fn test_straight_move_cost_scenario() {
        // Stamina max 100 at (0,0): move_by(1,0) costs ceil(100*0.04) = 4
        let mut actor = mobile_at(0, 0);
        let cost = actor.move_by(1, 0).unwrap();
        assert_eq!(cost, 4);
        assert_eq!(actor.resources.stamina.current, 96);
        assert_eq!(actor.position(), Position::new(1, 0, 0));
    }

    #[test]
    fn test_insufficient_stamina_leaves_state_unchanged() {
        // Diagonal costs 6; with 2 stamina the move must fail cleanly
        let mut actor = mobile_at(0, 0);
        actor.resources.stamina.current = 2;
        let result = actor.move_by(1, 1);
        assert_eq!(result, Err(MoveFailure::InsufficientStamina));
        assert_eq!(actor.position(), Position::new(0, 0, 0));
        assert_eq!(actor.resources.stamina.current, 2);
        assert!(actor.journal().is_empty());
    }

    #[test]
    fn test_static_actor_moves_for_free() {
        let mut actor = ActorContext::new(
            ActorHandle(2),
            ActorArchetype::StaticTile,
            Position::new(0, 0, 0),
            6,
            (64, 64),
        );
        // Stamina max is 0, so cost is 0 and the move always succeeds
        assert_eq!(actor.move_by(3, 3), Ok(0));
        assert_eq!(actor.position(), Position::new(3, 3, 0));
    }

    #[test]
    fn test_uncomputable_move_always_fails() {
        let mut actor = mobile_at(0, 0);
        actor.resources.stamina = crate::actor::resources::ResourceTriple::infinite();
        assert_eq!(actor.move_by(1, 0), Err(MoveFailure::Uncomputable));
    }

    #[test]
    fn test_level_shift_costs() {
        let mut actor = mobile_at(0, 0);
        actor.move_level_by(1).unwrap();
        assert_eq!(actor.resources.stamina.current, 96);
        assert_eq!(actor.level(), 1);
        actor.move_level_by(-1).unwrap();
        // Descend: ceil(100 * 0.04 * sqrt(3)) = 7
        assert_eq!(actor.resources.stamina.current, 89);
        assert_eq!(actor.level(), 0);
    }

    #[test]
    fn test_teleport_is_free_and_logged() {
        let mut actor = mobile_at(0, 0);
        actor.teleport_to(9, 9, 2);
        assert_eq!(actor.position(), Position::new(9, 9, 2));
        assert_eq!(actor.resources.stamina.current, 100);
        assert_eq!(actor.journal().len(), 1);
        assert_eq!(actor.journal().recent(0).unwrap().kind, TransitionKind::Teleport);
    }

    #[test]
    fn test_permit_duplicate_tick() {
        let mut actor = mobile_at(0, 0);
        let first = actor.apply_permit(5, 1, 0, 1);
        assert_eq!(first.outcome, DispatchOutcome::Accepted);

        // Same tick: Duplicate
        let second = actor.apply_permit(5, 0, 1, 1);
        assert_eq!(second.rejection, DispatchRejection::Duplicate);

        // Earlier tick: also Duplicate
        let third = actor.apply_permit(4, 0, 1, 1);
        assert_eq!(third.rejection, DispatchRejection::Duplicate);

        // Strictly later tick goes through
        let fourth = actor.apply_permit(6, 0, 1, 1);
        assert_eq!(fourth.outcome, DispatchOutcome::Accepted);
    }

    #[test]
    fn test_permit_zero_delta_free() {
        let mut actor = mobile_at(0, 0);
        let verdict = actor.apply_permit(1, 0, 0, 2);
        assert_eq!(verdict.outcome, DispatchOutcome::Accepted);
        assert_eq!(actor.resources.stamina.current, 100);
        assert_eq!(actor.last_tier, 2);
        assert!(actor.journal().is_empty());
    }

    #[test]
    fn test_permit_stamps_journal_tick() {
        let mut actor = mobile_at(0, 0);
        let verdict = actor.apply_permit(42, 1, 0, 0);
        assert_eq!(verdict.outcome, DispatchOutcome::Accepted);
        assert_eq!(actor.journal().recent(0).unwrap().tick, 42);
    }

    #[test]
    fn test_permit_stamina_rejection() {
        let mut actor = mobile_at(0, 0);
        actor.resources.stamina.current = 1;
        let verdict = actor.apply_permit(1, 1, 0, 0);
        assert_eq!(verdict.rejection, DispatchRejection::Stamina);
        assert_eq!(actor.last_rejection, DispatchRejection::Stamina);
        // A failed permit does not consume the tick
        let retry = actor.apply_permit(1, 0, 0, 0);
        assert_eq!(retry.outcome, DispatchOutcome::Accepted);
    }

    #[test]
    fn test_identity_derived_from_handle() {
        let a = mobile_at(0, 0);
        assert_eq!(a.identity(), crate::director::scramble(1));
    }

    #[test]
    fn test_introspection_snapshot() {
        let mut actor = mobile_at(0, 0);
        actor.resources.stamina.current = 0;
        actor.introspect(7);
        let snap = actor.introspection.unwrap();
        assert!(snap.stamina_depleted);
        assert!(!snap.health_depleted);
        assert_eq!(snap.occupancy, Occupancy::Blocking);
        assert_eq!(snap.tick, 7);
    }
}
