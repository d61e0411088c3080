//! Per-actor resource pillars and the movement cost model
//!
//! Four pillars (stamina, health, mana, durability) drive everything an
//! actor can do. The numeric cost model here must reproduce bit-for-bit:
//! downstream determinism tests depend on the exact ceil/floor behavior.

use serde::{Deserialize, Serialize};

/// Sentinel marking an inexhaustible pillar
pub const RESOURCE_INFINITY: i32 = i32::MAX;

/// Base cost fraction: a unit action costs 4% of the pillar maximum
const UNIT_COST_FRACTION: f64 = 4.0 / 100.0;

/// One resource pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTriple {
    pub current: i32,
    pub max: i32,
    pub regen: i32,
}

impl ResourceTriple {
    pub fn new(current: i32, max: i32, regen: i32) -> Self {
        Self { current, max, regen }
    }

    /// Full pillar at the given maximum, regen derived from the unit cost
    pub fn full(max: i32) -> Self {
        Self {
            current: max,
            max,
            regen: unit_action_cost(max, 1.0).max(1),
        }
    }

    pub fn zero() -> Self {
        Self { current: 0, max: 0, regen: 0 }
    }

    pub fn infinite() -> Self {
        Self {
            current: RESOURCE_INFINITY,
            max: RESOURCE_INFINITY,
            regen: RESOURCE_INFINITY,
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.max == RESOURCE_INFINITY
    }

    /// Spend `amount` if available. Returns false (no change) otherwise.
    pub fn spend(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Restore `amount`, clamped to max
    pub fn restore(&mut self, amount: i32) {
        if self.max <= 0 || self.is_infinite() {
            return;
        }
        self.current = (self.current.saturating_add(amount)).min(self.max);
    }
}

/// The four pillars of one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    pub stamina: ResourceTriple,
    pub health: ResourceTriple,
    pub mana: ResourceTriple,
    pub durability: ResourceTriple,
}

impl ResourceSet {
    /// Default signature for mobile units
    pub fn mobile() -> Self {
        Self {
            stamina: ResourceTriple::full(100),
            health: ResourceTriple::full(100),
            mana: ResourceTriple::full(50),
            durability: ResourceTriple::full(100),
        }
    }

    /// Canonical signature for static tiles: all-zero stamina/health/mana,
    /// all-infinite durability. Occupancy classification matches against
    /// this exact pattern.
    pub fn static_tile() -> Self {
        Self {
            stamina: ResourceTriple::zero(),
            health: ResourceTriple::zero(),
            mana: ResourceTriple::zero(),
            durability: ResourceTriple::infinite(),
        }
    }

    /// Cultivation regen: every finite, non-empty pillar recovers
    /// `2 * max(1, unit_action_cost(max))` per stationary tick.
    pub fn cultivate_tick(&mut self) {
        for pillar in [
            &mut self.stamina,
            &mut self.health,
            &mut self.mana,
            &mut self.durability,
        ] {
            if pillar.max <= 0 || pillar.is_infinite() {
                continue;
            }
            let unit = unit_action_cost(pillar.max, 1.0).max(1);
            pillar.restore(2 * unit);
        }
    }
}

/// Determines the default resource signature on spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorArchetype {
    Mobile,
    StaticTile,
}

impl ActorArchetype {
    pub fn default_resources(&self) -> ResourceSet {
        match self {
            ActorArchetype::Mobile => ResourceSet::mobile(),
            ActorArchetype::StaticTile => ResourceSet::static_tile(),
        }
    }
}

/// How a cell occupant affects movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupancy {
    Blocking,
    WalkableStatic,
}

/// Structural occupancy classification
///
/// Derived from the resource snapshot, not a stored flag: any actor whose
/// four pillars exactly match the static-tile signature is walkable,
/// whatever archetype spawned it.
pub fn classify_occupancy(resources: &ResourceSet) -> Occupancy {
    if *resources == ResourceSet::static_tile() {
        Occupancy::WalkableStatic
    } else {
        Occupancy::Blocking
    }
}

/// Cost multiplier for a straight planar step
pub const MULT_STRAIGHT: f64 = 1.0;
/// Cost multiplier for a diagonal planar step
pub const MULT_DIAGONAL: f64 = std::f64::consts::SQRT_2;
/// Cost multiplier for moving one level up
pub const MULT_ASCEND: f64 = 1.0;
/// Cost multiplier for moving one level down
pub const MULT_DESCEND: f64 = 1.7320508075688772;

/// Unit action cost for a pillar: `ceil(max * 4/100 * multiplier)`,
/// floored at 1. Zero for empty pillars, RESOURCE_INFINITY for infinite
/// ones (an infinite-cost move is uncomputable and always fails).
pub fn unit_action_cost(max: i32, multiplier: f64) -> i32 {
    if max <= 0 {
        return 0;
    }
    if max == RESOURCE_INFINITY {
        return RESOURCE_INFINITY;
    }
    let raw = (max as f64 * UNIT_COST_FRACTION * multiplier).ceil();
    if raw >= RESOURCE_INFINITY as f64 {
        return RESOURCE_INFINITY;
    }
    (raw as i32).max(1)
}

/// Stamina cost of a planar step `(dx, dy)` against a pillar maximum
///
/// The step decomposes into `min(|dx|,|dy|)` diagonal moves and the
/// remainder straight moves. If both counts are zero but a move occurred,
/// one straight unit is charged.
pub fn planar_move_cost(max: i32, dx: i32, dy: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    if max == RESOURCE_INFINITY {
        return RESOURCE_INFINITY;
    }
    let diagonal_steps = dx.abs().min(dy.abs());
    let straight_steps = dx.abs().max(dy.abs()) - diagonal_steps;

    let diagonal_unit = unit_action_cost(max, MULT_DIAGONAL);
    let straight_unit = unit_action_cost(max, MULT_STRAIGHT);

    if diagonal_steps == 0 && straight_steps == 0 {
        // Zero-delta fallback: a move that "occurred" still charges one unit
        return straight_unit;
    }

    diagonal_unit
        .saturating_mul(diagonal_steps)
        .saturating_add(straight_unit.saturating_mul(straight_steps))
}

/// Stamina cost of a vertical step `dz` (positive = ascend)
pub fn level_move_cost(max: i32, dz: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    if max == RESOURCE_INFINITY {
        return RESOURCE_INFINITY;
    }
    let mult = if dz >= 0 { MULT_ASCEND } else { MULT_DESCEND };
    unit_action_cost(max, mult).saturating_mul(dz.abs().max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cost_straight() {
        // ceil(100 * 0.04 * 1.0) = 4
        assert_eq!(unit_action_cost(100, MULT_STRAIGHT), 4);
    }

    #[test]
    fn test_unit_cost_diagonal() {
        // ceil(100 * 0.04 * 1.4142...) = ceil(5.656) = 6
        assert_eq!(unit_action_cost(100, MULT_DIAGONAL), 6);
    }

    #[test]
    fn test_unit_cost_floored_at_one() {
        assert_eq!(unit_action_cost(1, MULT_STRAIGHT), 1);
        assert_eq!(unit_action_cost(10, MULT_STRAIGHT), 1);
    }

    #[test]
    fn test_unit_cost_empty_pillar() {
        assert_eq!(unit_action_cost(0, MULT_STRAIGHT), 0);
        assert_eq!(unit_action_cost(-5, MULT_DIAGONAL), 0);
    }

    #[test]
    fn test_unit_cost_infinite_pillar() {
        assert_eq!(unit_action_cost(RESOURCE_INFINITY, MULT_STRAIGHT), RESOURCE_INFINITY);
    }

    #[test]
    fn test_planar_cost_decomposition() {
        // (3, 1): 1 diagonal + 2 straight = 6 + 2*4 = 14
        assert_eq!(planar_move_cost(100, 3, 1), 14);
        // Pure diagonal (2, 2): 2 * 6 = 12
        assert_eq!(planar_move_cost(100, 2, 2), 12);
        // Pure straight (0, 4): 4 * 4 = 16
        assert_eq!(planar_move_cost(100, 0, 4), 16);
    }

    #[test]
    fn test_planar_cost_zero_delta_fallback() {
        // Both step counts zero but a move occurred: one straight unit
        assert_eq!(planar_move_cost(100, 0, 0), 4);
    }

    #[test]
    fn test_planar_cost_empty_pillar_is_free() {
        assert_eq!(planar_move_cost(0, 5, 5), 0);
    }

    #[test]
    fn test_level_cost_ascend_descend() {
        // Ascend: ceil(100 * 0.04 * 1.0) = 4
        assert_eq!(level_move_cost(100, 1), 4);
        // Descend: ceil(100 * 0.04 * sqrt(3)) = ceil(6.928) = 7
        assert_eq!(level_move_cost(100, -1), 7);
        assert_eq!(level_move_cost(100, -2), 14);
    }

    #[test]
    fn test_spend_and_restore() {
        let mut pillar = ResourceTriple::full(100);
        assert!(pillar.spend(30));
        assert_eq!(pillar.current, 70);
        assert!(!pillar.spend(100));
        assert_eq!(pillar.current, 70);
        pillar.restore(500);
        assert_eq!(pillar.current, 100);
    }

    #[test]
    fn test_occupancy_is_structural() {
        assert_eq!(classify_occupancy(&ResourceSet::static_tile()), Occupancy::WalkableStatic);
        assert_eq!(classify_occupancy(&ResourceSet::mobile()), Occupancy::Blocking);

        // A mobile actor whose pillars drift into the exact static
        // signature becomes walkable: the class is derived, not stored.
        let mut forged = ResourceSet::mobile();
        forged.stamina = ResourceTriple::zero();
        forged.health = ResourceTriple::zero();
        forged.mana = ResourceTriple::zero();
        forged.durability = ResourceTriple::infinite();
        assert_eq!(classify_occupancy(&forged), Occupancy::WalkableStatic);

        // Near-misses stay blocking
        let mut near = ResourceSet::static_tile();
        near.mana.current = 1;
        assert_eq!(classify_occupancy(&near), Occupancy::Blocking);
    }

    #[test]
    fn test_cultivate_tick_regen() {
        let mut resources = ResourceSet::mobile();
        resources.stamina.current = 50;
        resources.mana.current = 10;
        resources.cultivate_tick();
        // Stamina: 2 * max(1, 4) = 8
        assert_eq!(resources.stamina.current, 58);
        // Mana (max 50): 2 * max(1, ceil(50*0.04)) = 2 * 2 = 4
        assert_eq!(resources.mana.current, 14);
    }

    #[test]
    fn test_cultivate_skips_infinite_and_empty() {
        let mut resources = ResourceSet::static_tile();
        resources.cultivate_tick();
        assert_eq!(resources, ResourceSet::static_tile());
    }
}
