//! Configurator: actor ledger and per-tick dispatch queue
//!
//! The coordinator consumes this surface: ledger order defines dispatch
//! order, the queue is rebuilt every tick from director intents plus
//! solver verdicts, and outcomes are recorded back after resolution.
//! Cultivation and vulnerability bookkeeping lives here, outside the
//! actor's own resource model.

use ahash::AHashMap;

use crate::actor::{ActorArchetype, ActorStore};
use crate::core::types::{
    ActorHandle, DispatchOutcome, DispatchRejection, MoveVector, Position, Tick,
};
use crate::director;
use crate::solver::{ReachabilityQuery, SolverAdapter, SolverMap};

/// Per-actor dispatch metadata carried through queue and results
#[derive(Debug, Clone, Copy)]
struct ActorMeta {
    tier: i32,
    aiu_mode: i32,
    aiu_aux: i32,
    cultivation_ticks: i32,
    vulnerability_ticks: i32,
    last_position: Position,
}

impl ActorMeta {
    fn new(position: Position) -> Self {
        Self {
            tier: 0,
            aiu_mode: 0,
            aiu_aux: 0,
            cultivation_ticks: 0,
            vulnerability_ticks: 0,
            last_position: position,
        }
    }
}

/// One scheduled dispatch attempt
#[derive(Debug, Clone)]
pub struct DispatchQueueEntry {
    pub actor: ActorHandle,
    pub initial: Position,
    pub intent: MoveVector,
    pub tier: i32,
    pub solver_code: i32,
    pub aiu_mode: i32,
    pub aiu_aux: i32,
    pub cultivation_ticks: i32,
    pub vulnerability_ticks: i32,
    /// Written back by the coordinator's commit phase
    pub outcome: DispatchOutcome,
    pub rejection: DispatchRejection,
}

pub struct Configurator {
    ledger: Vec<ActorHandle>,
    meta: AHashMap<ActorHandle, ActorMeta>,
    queue: Option<Vec<DispatchQueueEntry>>,
    solver_step_budget: i32,
}

impl Configurator {
    pub fn new(solver_step_budget: i32) -> Self {
        Self {
            ledger: Vec::new(),
            meta: AHashMap::new(),
            queue: None,
            solver_step_budget,
        }
    }

    /// Add an actor to the ledger. Ledger order is dispatch order and is
    /// part of the behavioral contract.
    pub fn enroll(&mut self, handle: ActorHandle, position: Position) {
        if self.meta.contains_key(&handle) {
            return;
        }
        self.ledger.push(handle);
        self.meta.insert(handle, ActorMeta::new(position));
    }

    pub fn withdraw(&mut self, handle: ActorHandle) {
        self.ledger.retain(|&h| h != handle);
        self.meta.remove(&handle);
    }

    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    pub fn ledger_handle(&self, index: usize) -> ActorHandle {
        self.ledger.get(index).copied().unwrap_or(ActorHandle::ABSENT)
    }

    pub fn ledger_handles(&self) -> &[ActorHandle] {
        &self.ledger
    }

    pub fn set_tier(&mut self, handle: ActorHandle, tier: i32) {
        if let Some(meta) = self.meta.get_mut(&handle) {
            meta.tier = tier;
        }
    }

    pub fn set_aiu(&mut self, handle: ActorHandle, mode: i32, aux: i32) {
        if let Some(meta) = self.meta.get_mut(&handle) {
            meta.aiu_mode = mode;
            meta.aiu_aux = aux;
        }
    }

    pub fn set_vulnerability(&mut self, handle: ActorHandle, ticks: i32) {
        if let Some(meta) = self.meta.get_mut(&handle) {
            meta.vulnerability_ticks = ticks;
        }
    }

    /// True while the actor has accumulated stationary cultivate ticks
    pub fn is_cultivating(&self, handle: ActorHandle) -> bool {
        self.meta
            .get(&handle)
            .map(|m| m.cultivation_ticks > 0)
            .unwrap_or(false)
    }

    pub fn cultivation_ticks(&self, handle: ActorHandle) -> i32 {
        self.meta.get(&handle).map(|m| m.cultivation_ticks).unwrap_or(0)
    }

    pub fn last_position(&self, handle: ActorHandle) -> Option<Position> {
        self.meta.get(&handle).map(|m| m.last_position)
    }

    /// Drop any queue retained from the previous tick
    pub fn clear_queue(&mut self) {
        self.queue = None;
    }

    /// Build the dispatch queue for `tick` in ledger order
    ///
    /// Each entry packages the director's intent for the actor, a solver
    /// verdict for the intended target, and the actor's pass-through
    /// metadata. Vulnerability counts down one per scheduled tick.
    pub fn build_queue(
        &mut self,
        tick: Tick,
        store: &ActorStore,
        solver: &mut SolverAdapter,
        map: &dyn SolverMap,
    ) {
        let mut entries = Vec::with_capacity(self.ledger.len());

        for (index, &handle) in self.ledger.iter().enumerate() {
            let Some(ctx) = store.get(handle) else {
                continue;
            };
            // Scenery never wanders; only mobile actors take director intents
            let intent = match ctx.archetype {
                ActorArchetype::Mobile => director::intent(tick, handle, index as u32),
                ActorArchetype::StaticTile => MoveVector::new(0, 0),
            };
            let initial = ctx.position();
            let target = initial.offset(intent.dx, intent.dy);

            let verdict = solver.reachability(
                Some(map),
                &ReachabilityQuery {
                    start: initial,
                    target,
                    max_steps: self.solver_step_budget,
                },
            );

            let Some(meta) = self.meta.get_mut(&handle) else {
                continue;
            };
            meta.vulnerability_ticks = (meta.vulnerability_ticks - 1).max(0);

            entries.push(DispatchQueueEntry {
                actor: handle,
                initial,
                intent,
                tier: meta.tier,
                solver_code: verdict.code.as_i32(),
                aiu_mode: meta.aiu_mode,
                aiu_aux: meta.aiu_aux,
                cultivation_ticks: meta.cultivation_ticks,
                vulnerability_ticks: meta.vulnerability_ticks,
                outcome: DispatchOutcome::Pending,
                rejection: DispatchRejection::None,
            });
        }

        self.queue = Some(entries);
    }

    /// Override a queued intent in place, e.g. for scripted scenarios
    pub fn force_intent(&mut self, index: usize, intent: MoveVector) {
        if let Some(entry) = self.queue.as_mut().and_then(|q| q.get_mut(index)) {
            entry.intent = intent;
        }
    }

    pub fn entry_count(&self) -> usize {
        self.queue.as_ref().map(|q| q.len()).unwrap_or(0)
    }

    pub fn has_queue(&self) -> bool {
        self.queue.is_some()
    }

    pub fn entry(&self, index: usize) -> Option<&DispatchQueueEntry> {
        self.queue.as_ref()?.get(index)
    }

    pub fn entries(&self) -> &[DispatchQueueEntry] {
        self.queue.as_deref().unwrap_or(&[])
    }

    /// Record a resolution outcome back into the queue and update
    /// cultivation: an accepted zero-delta permit is a stationary
    /// cultivate tick, anything else breaks the streak.
    pub fn record_outcome(
        &mut self,
        index: usize,
        outcome: DispatchOutcome,
        rejection: DispatchRejection,
    ) {
        let Some(queue) = self.queue.as_mut() else {
            return;
        };
        let Some(entry) = queue.get_mut(index) else {
            return;
        };
        entry.outcome = outcome;
        entry.rejection = rejection;

        if let Some(meta) = self.meta.get_mut(&entry.actor) {
            if outcome == DispatchOutcome::Accepted && entry.intent.is_zero() {
                meta.cultivation_ticks += 1;
            } else {
                meta.cultivation_ticks = 0;
            }
        }
    }

    /// Commit-phase ledger update with the authoritative position
    pub fn note_position(&mut self, handle: ActorHandle, position: Position) {
        if let Some(meta) = self.meta.get_mut(&handle) {
            meta.last_position = position;
        }
    }
}
