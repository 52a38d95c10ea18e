//! Unit and structure definitions

use serde::{Deserialize, Serialize};

/// Unit type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Queen,
    Worker,
    Drone,
    Soldier,
    RangedSoldier,
}

/// Structure type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    Anthill,
    Tunnel,
    Grass,
    Food,
}

/// Unit stat line
#[derive(Clone, Debug)]
pub struct UnitStats {
    pub name: &'static str,
    pub movement: u8,
    pub health: i32,
    pub attack: i32,
    pub range: u8,
    /// Food cost to build (None = cannot be built)
    pub cost: Option<i32>,
}

impl UnitStats {
    const fn new(
        name: &'static str,
        movement: u8,
        health: i32,
        attack: i32,
        range: u8,
        cost: Option<i32>,
    ) -> Self {
        Self {
            name,
            movement,
            health,
            attack,
            range,
            cost,
        }
    }
}

/// Stats indexed by `UnitType as usize`
pub static UNIT_STATS: [UnitStats; 5] = [
    UnitStats::new("Queen", 2, 10, 2, 1, None),
    UnitStats::new("Worker", 2, 2, 1, 1, Some(1)),
    UnitStats::new("Drone", 3, 2, 1, 1, Some(2)),
    UnitStats::new("Soldier", 2, 5, 2, 1, Some(3)),
    UnitStats::new("Ranged Soldier", 2, 2, 1, 3, Some(2)),
];

/// Every buildable unit type, in build-move generation order
pub const BUILDABLE: [UnitType; 4] = [
    UnitType::Worker,
    UnitType::Drone,
    UnitType::Soldier,
    UnitType::RangedSoldier,
];

/// Initial capture health of an anthill
pub const ANTHILL_CAPTURE_HEALTH: i32 = 3;

/// Food needed to win
pub const FOOD_GOAL: i32 = 11;

impl UnitType {
    pub fn stats(self) -> &'static UnitStats {
        &UNIT_STATS[self as usize]
    }

    /// Soldiers of either kind
    pub fn is_soldier(self) -> bool {
        matches!(self, UnitType::Soldier | UnitType::RangedSoldier)
    }
}

impl StructureType {
    /// Structures where a worker can drop its food
    pub fn is_depot(self) -> bool {
        matches!(self, StructureType::Anthill | StructureType::Tunnel)
    }
}
