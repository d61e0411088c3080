//! Shared grid map: blocked cells and the actor occupancy index
//!
//! Cells are keyed by `(x, y, level)`. Blocking is a property of the map
//! itself (walls, terrain); actor-vs-actor blocking is the coordinator's
//! business and lives in its per-tick occupancy map instead.

use ahash::{AHashMap, AHashSet};

use crate::core::types::{ActorHandle, Position};
use crate::solver::SolverMap;

#[derive(Debug, Clone)]
pub struct GridMap {
    width: i32,
    height: i32,
    blocked: AHashSet<(i32, i32, i32)>,
    actor_index: AHashMap<(i32, i32, i32), ActorHandle>,
    actor_cells: AHashMap<ActorHandle, (i32, i32, i32)>,
}

impl GridMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: AHashSet::new(),
            actor_index: AHashMap::new(),
            actor_cells: AHashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn block(&mut self, x: i32, y: i32, level: i32) {
        self.blocked.insert((x, y, level));
    }

    pub fn unblock(&mut self, x: i32, y: i32, level: i32) {
        self.blocked.remove(&(x, y, level));
    }

    pub fn is_blocked(&self, x: i32, y: i32, level: i32) -> bool {
        self.blocked.contains(&(x, y, level))
    }

    /// A cell is enterable when it lies on the field and is not blocked
    pub fn is_enterable(&self, x: i32, y: i32, level: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height && !self.is_blocked(x, y, level)
    }

    /// Place an actor in the occupancy index, vacating its previous cell.
    /// Returns false (no change) for non-enterable cells.
    pub fn set_actor_at(&mut self, handle: ActorHandle, x: i32, y: i32, level: i32) -> bool {
        if !self.is_enterable(x, y, level) {
            return false;
        }
        if let Some(old) = self.actor_cells.remove(&handle) {
            // Only vacate if the index still maps the old cell to us
            if self.actor_index.get(&old) == Some(&handle) {
                self.actor_index.remove(&old);
            }
        }
        self.actor_index.insert((x, y, level), handle);
        self.actor_cells.insert(handle, (x, y, level));
        true
    }

    pub fn actor_at(&self, x: i32, y: i32, level: i32) -> ActorHandle {
        self.actor_index
            .get(&(x, y, level))
            .copied()
            .unwrap_or(ActorHandle::ABSENT)
    }

    pub fn remove_actor(&mut self, handle: ActorHandle) {
        if let Some(cell) = self.actor_cells.remove(&handle) {
            if self.actor_index.get(&cell) == Some(&handle) {
                self.actor_index.remove(&cell);
            }
        }
    }

    pub fn actor_cell(&self, handle: ActorHandle) -> Option<Position> {
        self.actor_cells
            .get(&handle)
            .map(|&(x, y, level)| Position::new(x, y, level))
    }
}

impl SolverMap for GridMap {
    fn is_enterable(&self, x: i32, y: i32, level: i32) -> bool {
        GridMap::is_enterable(self, x, y, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enterable_bounds_and_blocking() {
        let mut map = GridMap::new(8, 8);
        assert!(map.is_enterable(0, 0, 0));
        assert!(map.is_enterable(7, 7, 3));
        assert!(!map.is_enterable(-1, 0, 0));
        assert!(!map.is_enterable(8, 0, 0));

        map.block(3, 3, 0);
        assert!(!map.is_enterable(3, 3, 0));
        // Blocking is per level
        assert!(map.is_enterable(3, 3, 1));

        map.unblock(3, 3, 0);
        assert!(map.is_enterable(3, 3, 0));
    }

    #[test]
    fn test_set_actor_vacates_previous_cell() {
        let mut map = GridMap::new(8, 8);
        let a = ActorHandle(1);
        assert!(map.set_actor_at(a, 1, 1, 0));
        assert!(map.set_actor_at(a, 2, 1, 0));
        assert_eq!(map.actor_at(1, 1, 0), ActorHandle::ABSENT);
        assert_eq!(map.actor_at(2, 1, 0), a);
        assert_eq!(map.actor_cell(a), Some(Position::new(2, 1, 0)));
    }

    #[test]
    fn test_set_actor_rejects_blocked_cell() {
        let mut map = GridMap::new(8, 8);
        map.block(4, 4, 0);
        assert!(!map.set_actor_at(ActorHandle(1), 4, 4, 0));
        assert_eq!(map.actor_at(4, 4, 0), ActorHandle::ABSENT);
    }

    #[test]
    fn test_remove_actor() {
        let mut map = GridMap::new(8, 8);
        let a = ActorHandle(1);
        map.set_actor_at(a, 1, 1, 0);
        map.remove_actor(a);
        assert_eq!(map.actor_at(1, 1, 0), ActorHandle::ABSENT);
        assert!(map.actor_cell(a).is_none());
    }

    #[test]
    fn test_colocated_actors_do_not_clobber_each_other() {
        let mut map = GridMap::new(8, 8);
        let a = ActorHandle(1);
        let b = ActorHandle(2);
        map.set_actor_at(a, 1, 1, 0);
        map.set_actor_at(b, 1, 1, 0); // b overwrites the index entry
        map.set_actor_at(a, 2, 2, 0); // a moving away must not evict b
        assert_eq!(map.actor_at(1, 1, 0), b);
        assert_eq!(map.actor_at(2, 2, 0), a);
    }
}
