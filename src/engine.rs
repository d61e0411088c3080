//! Engine façade: one struct owning the whole simulation
//!
//! Ties the subsystems together and drives the tick loop: every enrolled
//! actor runs its five-phase pipeline against a shared contact snapshot,
//! then the coordinator runs schedule, resolve and commit. Two engines
//! built from the same config and spawn sequence produce identical
//! summaries tick for tick.

use serde::Serialize;

use crate::actor::{ActorArchetype, ActorStore};
use crate::coordinator::{Coordinator, DispatchResult};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{ActorHandle, Position, Tick};
use crate::actor::pipeline;
use crate::moderator::Moderator;
use crate::radar::Octant;
use crate::solver::SolverAdapter;
use crate::world::{Configurator, GridMap};

/// Snapshot of one actor at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct ActorReport {
    pub handle: u32,
    pub x: i32,
    pub y: i32,
    pub level: i32,
    pub stamina: i32,
    pub cultivation_ticks: i32,
}

/// Serializable result of `Engine::run`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ticks: Tick,
    pub actor_count: usize,
    pub actors: Vec<ActorReport>,
    pub summaries: Vec<String>,
}

pub struct Engine {
    config: EngineConfig,
    store: ActorStore,
    map: GridMap,
    configurator: Configurator,
    solver: SolverAdapter,
    coordinator: Coordinator,
    moderator: Moderator,
    tick: Tick,
    next_request_id: i32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let bounds = (config.grid_width, config.grid_height);
        Ok(Self {
            store: ActorStore::new(config.radar_range, bounds),
            map: GridMap::new(config.grid_width, config.grid_height),
            configurator: Configurator::new(config.solver_step_budget),
            solver: SolverAdapter::new(),
            coordinator: Coordinator::new(config.summary_history),
            moderator: Moderator::new(config.summary_history),
            tick: 0,
            next_request_id: 1,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn store(&self) -> &ActorStore {
        &self.store
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut GridMap {
        &mut self.map
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    pub fn configurator_mut(&mut self) -> &mut Configurator {
        &mut self.configurator
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn moderator(&self) -> &Moderator {
        &self.moderator
    }

    fn spawn(&mut self, archetype: ActorArchetype, x: i32, y: i32) -> Result<ActorHandle> {
        if !self.map.is_enterable(x, y, 0) {
            return Err(EngineError::InvalidConfig(format!(
                "spawn cell ({}, {}) is not enterable",
                x, y
            )));
        }
        let position = Position::new(x, y, 0);
        let handle = self.store.create(archetype, position);
        if let Some(ctx) = self.store.get_mut(handle) {
            ctx.observation.set_window(self.config.observation_window);
        }
        self.configurator.enroll(handle, position);
        self.map.set_actor_at(handle, x, y, 0);
        tracing::debug!(handle = handle.0, x, y, ?archetype, "spawned actor");
        Ok(handle)
    }

    pub fn spawn_mobile(&mut self, x: i32, y: i32) -> Result<ActorHandle> {
        self.spawn(ActorArchetype::Mobile, x, y)
    }

    pub fn spawn_static(&mut self, x: i32, y: i32) -> Result<ActorHandle> {
        self.spawn(ActorArchetype::StaticTile, x, y)
    }

    /// Remove an actor from every subsystem
    pub fn destroy(&mut self, handle: ActorHandle) -> bool {
        let existed = self.store.destroy(handle);
        self.configurator.withdraw(handle);
        self.map.remove_actor(handle);
        existed
    }

    /// File an external interrogation against one of an actor's octant
    /// slots. Ids are positive and issued by the engine; the slot goes
    /// Pending until a sweep observes the octant or the window lapses.
    pub fn interrogate(&mut self, handle: ActorHandle, octant: Octant) -> Result<i32> {
        let tick = self.tick;
        let request_id = self.next_request_id;
        let ctx = self
            .store
            .get_mut(handle)
            .ok_or(EngineError::ActorNotFound(handle))?;
        ctx.observation.interrogate(octant, request_id, tick);
        self.next_request_id += 1;
        Ok(request_id)
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) {
        self.tick += 1;
        let tick = self.tick;

        // Per-actor pipeline against one shared contact snapshot, in
        // ledger order
        let contacts = self.store.contacts();
        let handles: Vec<ActorHandle> = self.configurator.ledger_handles().to_vec();
        for handle in handles {
            let cultivating = self.configurator.is_cultivating(handle);
            if let Some(ctx) = self.store.get_mut(handle) {
                pipeline::run_actor_tick(ctx, &contacts, cultivating, tick);
            }
        }

        self.coordinator.schedule(
            tick,
            &self.store,
            &mut self.configurator,
            &mut self.solver,
            &self.map,
        );
        self.coordinator
            .resolve(tick, &mut self.store, &self.configurator, &self.map);
        self.coordinator.commit(
            tick,
            &self.store,
            &mut self.configurator,
            &mut self.map,
            &mut self.moderator,
        );
    }

    pub fn results(&self) -> &[DispatchResult] {
        self.coordinator.results()
    }

    /// Run `ticks` ticks and collect a serializable report
    pub fn run(&mut self, ticks: u64) -> RunReport {
        for _ in 0..ticks {
            self.tick();
        }

        let mut actors: Vec<ActorReport> = self
            .configurator
            .ledger_handles()
            .iter()
            .filter_map(|&handle| {
                let ctx = self.store.get(handle)?;
                let position = ctx.position();
                Some(ActorReport {
                    handle: handle.0,
                    x: position.x,
                    y: position.y,
                    level: position.level,
                    stamina: ctx.resources.stamina.current,
                    cultivation_ticks: self.configurator.cultivation_ticks(handle),
                })
            })
            .collect();
        actors.sort_by_key(|a| a.handle);

        let summaries = (0..self.moderator.count())
            .filter_map(|i| self.moderator.get(i).map(str::to_owned))
            .collect();

        RunReport {
            ticks: self.tick,
            actor_count: actors.len(),
            actors,
            summaries,
        }
    }
}
