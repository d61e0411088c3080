//! Bounded spatial query adapter
//!
//! Answers reachability, guard-radius and waypoint queries against a map
//! collaborator. The reachability path is a straight-line placeholder, not
//! a real shortest path. Verdicts are cached in a small flat FIFO keyed by
//! a packed 64-bit hash; the per-call query seed participates in the key,
//! so identical geometric queries across calls miss by construction. Both
//! quirks are preserved deliberately (see DESIGN.md).

use serde::{Deserialize, Serialize};

use crate::core::types::Position;

/// Stable integer result codes exposed across the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum SolverCode {
    Sat = 1,
    Unsat = 2,
    Timeout = 3,
    Error = 4,
    Unimplemented = 5,
}

impl SolverCode {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn from_i32(code: i32) -> Option<SolverCode> {
        match code {
            1 => Some(SolverCode::Sat),
            2 => Some(SolverCode::Unsat),
            3 => Some(SolverCode::Timeout),
            4 => Some(SolverCode::Error),
            5 => Some(SolverCode::Unimplemented),
            _ => None,
        }
    }
}

/// Query schema discriminants, part of the cache key
const SCHEMA_REACHABILITY: u32 = 1;
const SCHEMA_GUARD_RADIUS: u32 = 2;
const SCHEMA_WAYPOINT: u32 = 3;

/// Cache capacity; eviction is FIFO, oldest first
pub const CACHE_CAPACITY: usize = 32;

/// The solver's view of the map collaborator
pub trait SolverMap {
    fn is_enterable(&self, x: i32, y: i32, level: i32) -> bool;
}

/// One placeholder path step: the whole straight-line delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub dx: i32,
    pub dy: i32,
    pub dlevel: i32,
}

/// Verdict plus placeholder path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverVerdict {
    pub code: SolverCode,
    pub path: Vec<PathStep>,
}

impl SolverVerdict {
    fn bare(code: SolverCode) -> Self {
        Self { code, path: Vec::new() }
    }
}

#[derive(Debug, Clone)]
pub struct ReachabilityQuery {
    pub start: Position,
    pub target: Position,
    pub max_steps: i32,
}

#[derive(Debug, Clone)]
pub struct GuardRadiusQuery {
    pub center: Position,
    pub radius: i32,
}

#[derive(Debug, Clone)]
pub struct WaypointQuery {
    pub waypoints: Vec<Position>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: u64,
    verdict: SolverVerdict,
}

/// Pack a query into the 64-bit cache key
///
/// Six 16-bit fields do not fit in 64 bits; the last two params are folded
/// in by XOR at overlapping offsets. Collision-prone on purpose: this
/// packing is observable behavior and is reproduced exactly.
fn pack_key(schema: u32, seed: u32, params: [i32; 4]) -> u64 {
    let mut key = (schema as u64 & 0xffff) << 48;
    key |= (seed as u64 & 0xffff) << 32;
    key |= ((params[0] as u32 as u64) & 0xffff) << 16;
    key |= (params[1] as u32 as u64) & 0xffff;
    key ^= ((params[2] as u32 as u64) & 0xffff) << 24;
    key ^= ((params[3] as u32 as u64) & 0xffff) << 8;
    key
}

/// Per-context solver adapter with a bounded verdict cache
pub struct SolverAdapter {
    query_seed: u32,
    cache: Vec<CacheEntry>,
}

impl SolverAdapter {
    pub fn new() -> Self {
        Self {
            query_seed: 0,
            cache: Vec::with_capacity(CACHE_CAPACITY),
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn query_seed(&self) -> u32 {
        self.query_seed
    }

    fn cache_lookup(&self, key: u64) -> Option<&SolverVerdict> {
        self.cache.iter().find(|e| e.key == key).map(|e| &e.verdict)
    }

    fn cache_store(&mut self, key: u64, verdict: SolverVerdict) {
        if self.cache.len() >= CACHE_CAPACITY {
            self.cache.remove(0); // FIFO, not LRU
        }
        self.cache.push(CacheEntry { key, verdict });
    }

    /// Can `target` be reached from `start` within `max_steps`?
    ///
    /// `map` is the bound collaborator; `None` means the context was never
    /// bound and yields `Error`. The Sat path is `max(manhattan, 1)`
    /// identical whole-delta steps - a placeholder, not a route.
    pub fn reachability(
        &mut self,
        map: Option<&dyn SolverMap>,
        query: &ReachabilityQuery,
    ) -> SolverVerdict {
        // The seed advances before hashing on every call
        self.query_seed = self.query_seed.wrapping_add(1);
        let key = pack_key(
            SCHEMA_REACHABILITY,
            self.query_seed,
            [query.start.x, query.start.y, query.target.x, query.target.y],
        );
        if let Some(hit) = self.cache_lookup(key) {
            tracing::debug!(key, "solver cache hit");
            return hit.clone();
        }

        let verdict = self.reachability_uncached(map, query);
        self.cache_store(key, verdict.clone());
        verdict
    }

    fn reachability_uncached(
        &self,
        map: Option<&dyn SolverMap>,
        query: &ReachabilityQuery,
    ) -> SolverVerdict {
        let Some(map) = map else {
            return SolverVerdict::bare(SolverCode::Error);
        };
        if query.max_steps <= 0 {
            return SolverVerdict::bare(SolverCode::Timeout);
        }
        if !map.is_enterable(query.target.x, query.target.y, query.target.level) {
            return SolverVerdict::bare(SolverCode::Unsat);
        }
        let manhattan = query.start.manhattan(&query.target);
        if manhattan > query.max_steps {
            return SolverVerdict::bare(SolverCode::Timeout);
        }

        let step = PathStep {
            dx: query.target.x - query.start.x,
            dy: query.target.y - query.start.y,
            dlevel: query.target.level - query.start.level,
        };
        let steps = manhattan.max(1) as usize;
        SolverVerdict {
            code: SolverCode::Sat,
            path: vec![step; steps],
        }
    }

    /// Guard-radius query: stubbed, always Unsat
    pub fn guard_radius(
        &mut self,
        _map: Option<&dyn SolverMap>,
        query: &GuardRadiusQuery,
    ) -> SolverVerdict {
        self.query_seed = self.query_seed.wrapping_add(1);
        let key = pack_key(
            SCHEMA_GUARD_RADIUS,
            self.query_seed,
            [query.center.x, query.center.y, query.center.level, query.radius],
        );
        if let Some(hit) = self.cache_lookup(key) {
            return hit.clone();
        }
        let verdict = SolverVerdict::bare(SolverCode::Unsat);
        self.cache_store(key, verdict.clone());
        verdict
    }

    /// Waypoint query: stubbed, always Unimplemented (including the
    /// zero-waypoint case)
    pub fn waypoint(
        &mut self,
        _map: Option<&dyn SolverMap>,
        query: &WaypointQuery,
    ) -> SolverVerdict {
        self.query_seed = self.query_seed.wrapping_add(1);
        let first = query.waypoints.first().copied().unwrap_or_default();
        let key = pack_key(
            SCHEMA_WAYPOINT,
            self.query_seed,
            [first.x, first.y, first.level, query.waypoints.len() as i32],
        );
        if let Some(hit) = self.cache_lookup(key) {
            return hit.clone();
        }
        let verdict = SolverVerdict::bare(SolverCode::Unimplemented);
        self.cache_store(key, verdict.clone());
        verdict
    }
}

impl Default for SolverAdapter {
    fn default() -> Self {
        Self::new()
    }
}
