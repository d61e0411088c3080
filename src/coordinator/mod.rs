//! Coordinator: schedule -> resolve -> commit
//!
//! Turns independently generated intents into a conflict-free
//! authoritative update. Resolution is a deterministic sequential walk
//! over the dispatch queue: queue order is the sole tie-break, and the
//! occupancy map is updated entry by entry so every later entry already
//! observes earlier winners. This order dependence is part of the
//! behavioral contract; a parallel resolver would not be equivalent.

use ahash::AHashMap;
use serde::Serialize;

use crate::actor::ActorStore;
use crate::core::ring::Ring;
use crate::core::types::{ActorHandle, DispatchOutcome, DispatchRejection, Tick};
use crate::moderator::Moderator;
use crate::solver::{SolverAdapter, SolverMap};
use crate::world::{Configurator, GridMap};

/// Authoritative record of what happened to one actor this tick,
/// independent of what was requested
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub actor: ActorHandle,
    pub dx: i32,
    pub dy: i32,
    pub tier: i32,
    pub outcome: DispatchOutcome,
    pub rejection: DispatchRejection,
    pub solver_code: i32,
    pub aiu_mode: i32,
    pub aiu_aux: i32,
    pub cultivation_ticks: i32,
    pub vulnerability_ticks: i32,
}

/// Normalize a permit-layer rejection to the dispatch taxonomy.
/// Anything outside {Stamina, Blocked, Duplicate} collapses to None.
fn normalize_rejection(rejection: DispatchRejection) -> DispatchRejection {
    match rejection {
        DispatchRejection::Stamina => DispatchRejection::Stamina,
        DispatchRejection::Blocked => DispatchRejection::Blocked,
        DispatchRejection::Duplicate => DispatchRejection::Duplicate,
        _ => DispatchRejection::None,
    }
}

pub struct Coordinator {
    results: Vec<DispatchResult>,
    queue_len: usize,
    summaries: Ring<String>,
}

impl Coordinator {
    pub fn new(summary_history: usize) -> Self {
        Self {
            results: Vec::new(),
            queue_len: 0,
            summaries: Ring::new(summary_history),
        }
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn result(&self, index: usize) -> Option<&DispatchResult> {
        self.results.get(index)
    }

    pub fn results(&self) -> &[DispatchResult] {
        &self.results
    }

    pub fn summary_count(&self) -> usize {
        self.summaries.len()
    }

    pub fn summary(&self, index: usize) -> Option<&str> {
        self.summaries.chronological(index).map(|s| s.as_str())
    }

    /// Schedule phase: drop last tick's queue and build a fresh one
    pub fn schedule(
        &mut self,
        tick: Tick,
        store: &ActorStore,
        configurator: &mut Configurator,
        solver: &mut SolverAdapter,
        map: &dyn SolverMap,
    ) {
        configurator.clear_queue();
        configurator.build_queue(tick, store, solver, map);
        self.queue_len = configurator.entry_count();
        self.results.clear();
        tracing::debug!(tick, queue_len = self.queue_len, "scheduled dispatch queue");
    }

    /// Resolve phase: walk the queue in order against a live occupancy map
    pub fn resolve(
        &mut self,
        tick: Tick,
        store: &mut ActorStore,
        configurator: &Configurator,
        map: &GridMap,
    ) {
        let entries = configurator.entries();

        // Claim every distinct initial cell for its first occupant. A
        // later entry on an already-claimed cell does not overwrite: the
        // actor already there owns it.
        let mut occupancy: AHashMap<(i32, i32, i32), ActorHandle> = AHashMap::new();
        for entry in entries {
            let cell = (entry.initial.x, entry.initial.y, entry.initial.level);
            occupancy.entry(cell).or_insert(entry.actor);
        }

        for entry in entries {
            let initial = entry.initial;
            let target = initial.offset(entry.intent.dx, entry.intent.dy);
            let target_cell = (target.x, target.y, target.level);

            let contested = occupancy
                .get(&target_cell)
                .map(|&occupant| occupant != entry.actor)
                .unwrap_or(false);
            let unenterable = !map.is_enterable(target.x, target.y, target.level);

            let (outcome, rejection) = if !entry.intent.is_zero() && (contested || unenterable) {
                // Target owned by someone else this tick, off the field
                // or terrain-blocked; the permit is never consulted
                (DispatchOutcome::Rejected, DispatchRejection::Blocked)
            } else {
                match store.get_mut(entry.actor) {
                    Some(ctx) => {
                        let verdict =
                            ctx.apply_permit(tick, entry.intent.dx, entry.intent.dy, entry.tier);
                        (verdict.outcome, normalize_rejection(verdict.rejection))
                    }
                    None => (DispatchOutcome::Rejected, DispatchRejection::None),
                }
            };

            if outcome == DispatchOutcome::Accepted && !entry.intent.is_zero() {
                // Vacate-then-claim so the next entry sees this actor's
                // new position
                let initial_cell = (initial.x, initial.y, initial.level);
                if occupancy.get(&initial_cell) == Some(&entry.actor) {
                    occupancy.remove(&initial_cell);
                }
                occupancy.insert(target_cell, entry.actor);
            }

            self.results.push(DispatchResult {
                actor: entry.actor,
                dx: entry.intent.dx,
                dy: entry.intent.dy,
                tier: entry.tier,
                outcome,
                rejection,
                solver_code: entry.solver_code,
                aiu_mode: entry.aiu_mode,
                aiu_aux: entry.aiu_aux,
                cultivation_ticks: entry.cultivation_ticks,
                vulnerability_ticks: entry.vulnerability_ticks,
            });
        }
    }

    /// Commit phase: write outcomes back, publish accepted positions and
    /// emit the per-tick summary. The summary cadence never skips a tick.
    pub fn commit(
        &mut self,
        tick: Tick,
        store: &ActorStore,
        configurator: &mut Configurator,
        map: &mut GridMap,
        moderator: &mut Moderator,
    ) {
        let mut lines: Vec<String> = Vec::with_capacity(self.results.len());

        for (index, result) in self.results.iter().enumerate() {
            configurator.record_outcome(index, result.outcome, result.rejection);

            let Some(ctx) = store.get(result.actor) else {
                continue;
            };
            let position = ctx.position();

            if result.outcome == DispatchOutcome::Accepted {
                map.set_actor_at(result.actor, position.x, position.y, position.level);
                configurator.note_position(result.actor, position);
            }

            lines.push(format!(
                "a{} t{} d({},{}) {:?}/{:?} s{} @({},{},{})",
                result.actor.0,
                result.tier,
                result.dx,
                result.dy,
                result.outcome,
                result.rejection,
                result.solver_code,
                position.x,
                position.y,
                position.level,
            ));
        }

        let summary = if lines.is_empty() {
            format!("tick {}: (no results)", tick)
        } else {
            format!("tick {}: {}", tick, lines.join("; "))
        };

        tracing::debug!(tick, "{}", summary);
        self.summaries.push(summary.clone());
        moderator.report(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::resources::ActorArchetype;
    use crate::core::types::{MoveVector, Position};

    struct Rig {
        store: ActorStore,
        configurator: Configurator,
        solver: SolverAdapter,
        map: GridMap,
        moderator: Moderator,
        coordinator: Coordinator,
    }

    fn rig(positions: &[(i32, i32)]) -> Rig {
        let mut store = ActorStore::new(6, (32, 32));
        let mut configurator = Configurator::new(8);
        let mut map = GridMap::new(32, 32);
        for &(x, y) in positions {
            let h = store.create(ActorArchetype::Mobile, Position::new(x, y, 0));
            configurator.enroll(h, Position::new(x, y, 0));
            map.set_actor_at(h, x, y, 0);
        }
        Rig {
            store,
            configurator,
            solver: SolverAdapter::new(),
            map,
            moderator: Moderator::new(16),
            coordinator: Coordinator::new(16),
        }
    }

    /// Build the queue normally, then rewrite the intents under test
    fn force_intents(rig: &mut Rig, tick: Tick, intents: &[(i32, i32)]) {
        rig.coordinator.schedule(
            tick,
            &rig.store,
            &mut rig.configurator,
            &mut rig.solver,
            &rig.map,
        );
        for (i, &(dx, dy)) in intents.iter().enumerate() {
            rig.configurator.force_intent(i, MoveVector::new(dx, dy));
        }
    }

    #[test]
    fn test_contested_cell_first_in_queue_wins() {
        // X at (4,5) and Y at (5,4) both want (5,5); X is queued first
        let mut rig = rig(&[(4, 5), (5, 4)]);
        force_intents(&mut rig, 1, &[(1, 0), (0, 1)]);

        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);

        let x = rig.coordinator.result(0).unwrap();
        assert_eq!(x.outcome, DispatchOutcome::Accepted);
        let y = rig.coordinator.result(1).unwrap();
        assert_eq!(y.outcome, DispatchOutcome::Rejected);
        assert_eq!(y.rejection, DispatchRejection::Blocked);

        assert_eq!(
            rig.store.get(ActorHandle(1)).unwrap().position(),
            Position::new(5, 5, 0)
        );
        assert_eq!(
            rig.store.get(ActorHandle(2)).unwrap().position(),
            Position::new(5, 4, 0)
        );
    }

    #[test]
    fn test_vacated_cell_usable_same_tick() {
        // Actor 1 leaves (4,5) eastward; actor 2 moves into (4,5)
        let mut rig = rig(&[(4, 5), (3, 5)]);
        force_intents(&mut rig, 1, &[(1, 0), (1, 0)]);

        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);

        assert_eq!(rig.coordinator.result(0).unwrap().outcome, DispatchOutcome::Accepted);
        assert_eq!(rig.coordinator.result(1).unwrap().outcome, DispatchOutcome::Accepted);
        assert_eq!(
            rig.store.get(ActorHandle(2)).unwrap().position(),
            Position::new(4, 5, 0)
        );
    }

    #[test]
    fn test_occupied_cell_blocks_without_permit_call() {
        // Actor 2 tries to enter actor 1's cell while 1 stays put
        let mut rig = rig(&[(5, 5), (4, 5)]);
        force_intents(&mut rig, 1, &[(0, 0), (1, 0)]);

        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);

        let blocked = rig.coordinator.result(1).unwrap();
        assert_eq!(blocked.rejection, DispatchRejection::Blocked);
        // The permit was never consulted, so tick 1 is still available
        let ctx = rig.store.get_mut(ActorHandle(2)).unwrap();
        assert!(ctx.last_accepted_tick().is_none());
        let retry = ctx.apply_permit(1, 0, 0, 0);
        assert_eq!(retry.outcome, DispatchOutcome::Accepted);
    }

    #[test]
    fn test_terrain_blocked_target_rejected() {
        let mut rig = rig(&[(1, 1)]);
        rig.map.block(2, 1, 0);
        force_intents(&mut rig, 1, &[(1, 0)]);

        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);

        let result = rig.coordinator.result(0).unwrap();
        assert_eq!(result.outcome, DispatchOutcome::Rejected);
        assert_eq!(result.rejection, DispatchRejection::Blocked);
        assert_eq!(
            rig.store.get(ActorHandle(1)).unwrap().position(),
            Position::new(1, 1, 0)
        );
    }

    #[test]
    fn test_off_field_target_rejected() {
        let mut rig = rig(&[(0, 0)]);
        force_intents(&mut rig, 1, &[(-1, 0)]);

        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);

        assert_eq!(
            rig.coordinator.result(0).unwrap().rejection,
            DispatchRejection::Blocked
        );
    }

    #[test]
    fn test_stamina_rejection_surfaces_in_results() {
        let mut rig = rig(&[(1, 1)]);
        rig.store
            .get_mut(ActorHandle(1))
            .unwrap()
            .resources
            .stamina
            .current = 1;
        force_intents(&mut rig, 1, &[(1, 0)]);

        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);
        let result = rig.coordinator.result(0).unwrap();
        assert_eq!(result.outcome, DispatchOutcome::Rejected);
        assert_eq!(result.rejection, DispatchRejection::Stamina);
    }

    #[test]
    fn test_commit_publishes_accepted_positions() {
        let mut rig = rig(&[(1, 1)]);
        force_intents(&mut rig, 1, &[(1, 0)]);
        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);
        rig.coordinator.commit(
            1,
            &rig.store,
            &mut rig.configurator,
            &mut rig.map,
            &mut rig.moderator,
        );

        assert_eq!(rig.map.actor_at(2, 1, 0), ActorHandle(1));
        assert_eq!(
            rig.configurator.last_position(ActorHandle(1)),
            Some(Position::new(2, 1, 0))
        );
        assert_eq!(
            rig.configurator.entry(0).unwrap().outcome,
            DispatchOutcome::Accepted
        );
        assert_eq!(rig.moderator.count(), 1);
        assert!(rig.moderator.latest().unwrap().contains("a1"));
    }

    #[test]
    fn test_empty_queue_still_emits_summary() {
        let mut rig = rig(&[]);
        rig.coordinator.schedule(
            1,
            &rig.store,
            &mut rig.configurator,
            &mut rig.solver,
            &rig.map,
        );
        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);
        rig.coordinator.commit(
            1,
            &rig.store,
            &mut rig.configurator,
            &mut rig.map,
            &mut rig.moderator,
        );

        assert_eq!(rig.moderator.count(), 1);
        assert_eq!(rig.moderator.latest(), Some("tick 1: (no results)"));
        assert_eq!(rig.coordinator.summary(0), Some("tick 1: (no results)"));
    }

    #[test]
    fn test_results_carry_metadata() {
        let mut rig = rig(&[(1, 1)]);
        rig.configurator.set_tier(ActorHandle(1), 2);
        rig.configurator.set_aiu(ActorHandle(1), 5, 9);
        force_intents(&mut rig, 1, &[(0, 1)]);
        rig.coordinator.resolve(1, &mut rig.store, &rig.configurator, &rig.map);

        let result = rig.coordinator.result(0).unwrap();
        assert_eq!(result.tier, 2);
        assert_eq!(result.aiu_mode, 5);
        assert_eq!(result.aiu_aux, 9);
    }
}
