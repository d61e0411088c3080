//! Actor store: the single owner of all per-actor state
//!
//! Handles are issued by a monotonic counter and are the registry key in
//! both directions; nothing outside the store sees actor internals except
//! through the context it hands out.

use ahash::AHashMap;

use crate::actor::context::ActorContext;
use crate::actor::resources::ActorArchetype;
use crate::core::types::{ActorHandle, Position};
use crate::radar::RadarContact;

pub struct ActorStore {
    actors: AHashMap<ActorHandle, ActorContext>,
    next_handle: u32,
    radar_range: i32,
    bounds: (i32, i32),
}

impl ActorStore {
    pub fn new(radar_range: i32, bounds: (i32, i32)) -> Self {
        Self {
            actors: AHashMap::new(),
            next_handle: 1,
            radar_range,
            bounds,
        }
    }

    /// Issue a fresh handle and create its context
    pub fn create(&mut self, archetype: ActorArchetype, position: Position) -> ActorHandle {
        let handle = ActorHandle(self.next_handle);
        self.next_handle += 1;
        let context = ActorContext::new(handle, archetype, position, self.radar_range, self.bounds);
        self.actors.insert(handle, context);
        handle
    }

    /// Fetch a context, creating a default mobile actor at the origin if
    /// the handle has never been materialized. Absent handles get nothing.
    pub fn ensure(&mut self, handle: ActorHandle) -> Option<&mut ActorContext> {
        if handle.is_absent() {
            return None;
        }
        if !self.actors.contains_key(&handle) {
            if handle.0 >= self.next_handle {
                self.next_handle = handle.0 + 1;
            }
            let context = ActorContext::new(
                handle,
                ActorArchetype::Mobile,
                Position::default(),
                self.radar_range,
                self.bounds,
            );
            self.actors.insert(handle, context);
        }
        self.actors.get_mut(&handle)
    }

    /// Remove an actor entirely (store and radar registry in one step)
    pub fn destroy(&mut self, handle: ActorHandle) -> bool {
        self.actors.remove(&handle).is_some()
    }

    pub fn get(&self, handle: ActorHandle) -> Option<&ActorContext> {
        self.actors.get(&handle)
    }

    pub fn get_mut(&mut self, handle: ActorHandle) -> Option<&mut ActorContext> {
        self.actors.get_mut(&handle)
    }

    pub fn contains(&self, handle: ActorHandle) -> bool {
        self.actors.contains_key(&handle)
    }

    pub fn count(&self) -> usize {
        self.actors.len()
    }

    /// Immutable contact snapshot for the radar sweep, ordered by handle
    /// so scans are deterministic regardless of map iteration order.
    pub fn contacts(&self) -> Vec<RadarContact> {
        let mut contacts: Vec<RadarContact> = self
            .actors
            .values()
            .map(|ctx| RadarContact {
                handle: ctx.handle(),
                position: ctx.position(),
                occupancy: ctx.occupancy(),
                stamina: ctx.resources.stamina,
            })
            .collect();
        contacts.sort_by_key(|c| c.handle.0);
        contacts
    }
}
