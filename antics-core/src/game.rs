//! Game state, legal move generation and the referee step

use std::collections::VecDeque;

use crate::board::{Coord, BOARD_SIZE};
use crate::transition;
use crate::units::{StructureType, UnitType, ANTHILL_CAPTURE_HEALTH, BUILDABLE, FOOD_GOAL};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A unit on the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitType,
    pub coord: Coord,
    pub health: i32,
    pub carrying: bool,
    pub has_moved: bool,
}

impl Unit {
    /// Fresh unit at full health
    pub fn new(kind: UnitType, coord: Coord) -> Self {
        Self {
            kind,
            coord,
            health: kind.stats().health,
            carrying: false,
            has_moved: false,
        }
    }
}

/// A structure on the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Construction {
    pub kind: StructureType,
    pub coord: Coord,
    pub capture_health: i32,
}

impl Construction {
    pub fn new(kind: StructureType, coord: Coord) -> Self {
        let capture_health = match kind {
            StructureType::Anthill => ANTHILL_CAPTURE_HEALTH,
            _ => 0,
        };
        Self {
            kind,
            coord,
            capture_health,
        }
    }
}

/// Everything one player owns
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub units: Vec<Unit>,
    pub constructions: Vec<Construction>,
    pub food: i32,
}

impl Inventory {
    pub fn anthill(&self) -> Option<&Construction> {
        self.constructions
            .iter()
            .find(|c| c.kind == StructureType::Anthill)
    }

    pub fn anthill_mut(&mut self) -> Option<&mut Construction> {
        self.constructions
            .iter_mut()
            .find(|c| c.kind == StructureType::Anthill)
    }

    pub fn tunnels(&self) -> impl Iterator<Item = &Construction> + '_ {
        self.constructions
            .iter()
            .filter(|c| c.kind == StructureType::Tunnel)
    }

    /// Anthill and tunnels
    pub fn depots(&self) -> impl Iterator<Item = Coord> + '_ {
        self.constructions
            .iter()
            .filter(|c| c.kind.is_depot())
            .map(|c| c.coord)
    }

    pub fn queen(&self) -> Option<&Unit> {
        self.units.iter().find(|u| u.kind == UnitType::Queen)
    }

    pub fn units_of(&self, kind: UnitType) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |u| u.kind == kind)
    }

    pub fn count(&self, kind: UnitType) -> usize {
        self.units_of(kind).count()
    }
}

/// What a build move produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildKind {
    Unit(UnitType),
    Structure(StructureType),
}

/// A move
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    EndTurn,
    Build(BuildKind),
    /// Path from the unit's origin (first) to its destination (last)
    MoveUnit(Vec<Coord>),
}

impl Move {
    pub fn is_end_turn(&self) -> bool {
        matches!(self, Move::EndTurn)
    }

    pub fn build_unit(kind: UnitType) -> Self {
        Move::Build(BuildKind::Unit(kind))
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to mutate)
///
/// Board occupancy is derived from the inventories, so unit membership and
/// occupancy cannot disagree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    inventories: [Inventory; 2],
    /// Food sources and grass
    neutral: Vec<Construction>,
    whose_turn: Player,
    /// Completed turns
    pub turn: u32,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, player one to move
    pub fn empty() -> Self {
        Self {
            inventories: [Inventory::default(), Inventory::default()],
            neutral: Vec::new(),
            whose_turn: Player::One,
            turn: 0,
        }
    }

    /// Standard opening: queen on the anthill, one worker on the tunnel,
    /// two food sources on each side. Player two's layout mirrors player one's.
    pub fn opening() -> Self {
        let mut state = Self::empty();

        let anthill = Coord::new(2, 1);
        let tunnel = Coord::new(7, 2);
        let food = [Coord::new(0, 3), Coord::new(9, 2)];

        for player in [Player::One, Player::Two] {
            let place = |c: Coord| match player {
                Player::One => c,
                Player::Two => mirror(c),
            };
            let inv = state.inventory_mut(player);
            inv.constructions
                .push(Construction::new(StructureType::Anthill, place(anthill)));
            inv.constructions
                .push(Construction::new(StructureType::Tunnel, place(tunnel)));
            inv.units.push(Unit::new(UnitType::Queen, place(anthill)));
            inv.units.push(Unit::new(UnitType::Worker, place(tunnel)));
            for f in food {
                state
                    .neutral
                    .push(Construction::new(StructureType::Food, place(f)));
            }
        }

        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.whose_turn
    }

    pub fn set_current_player(&mut self, player: Player) {
        self.whose_turn = player;
    }

    pub fn inventory(&self, player: Player) -> &Inventory {
        &self.inventories[player.index()]
    }

    pub fn inventory_mut(&mut self, player: Player) -> &mut Inventory {
        &mut self.inventories[player.index()]
    }

    pub fn neutral(&self) -> &[Construction] {
        &self.neutral
    }

    pub fn add_neutral(&mut self, construction: Construction) {
        self.neutral.push(construction);
    }

    /// Coordinates of all food sources
    pub fn food_sources(&self) -> impl Iterator<Item = Coord> + '_ {
        self.neutral
            .iter()
            .filter(|c| c.kind == StructureType::Food)
            .map(|c| c.coord)
    }

    /// Unit occupying a coordinate, with its owner
    pub fn unit_at(&self, coord: Coord) -> Option<(Player, &Unit)> {
        [Player::One, Player::Two].into_iter().find_map(|p| {
            self.inventory(p)
                .units
                .iter()
                .find(|u| u.coord == coord)
                .map(|u| (p, u))
        })
    }

    fn occupied(&self) -> FxHashSet<Coord> {
        self.inventories
            .iter()
            .flat_map(|inv| inv.units.iter().map(|u| u.coord))
            .collect()
    }

    /// Winner, if the game is over.
    ///
    /// Losing your queen or your anthill ends the game before the food goal
    /// is considered.
    pub fn winner(&self) -> Option<Player> {
        for player in [Player::One, Player::Two] {
            let inv = self.inventory(player);
            let anthill_taken = inv.anthill().map_or(false, |a| a.capture_health <= 0);
            if inv.queen().is_none() || anthill_taken {
                return Some(player.opponent());
            }
        }
        [Player::One, Player::Two]
            .into_iter()
            .find(|&p| self.inventory(p).food >= FOOD_GOAL)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves for the current player: unit moves, then builds,
    /// then end turn (always present while the game is on).
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return vec![];
        }

        let me = self.current_player();
        let inv = self.inventory(me);
        let occupied = self.occupied();
        let mut moves = Vec::new();

        for unit in inv.units.iter().filter(|u| !u.has_moved) {
            generate_unit_moves(unit, &occupied, &mut moves);
        }

        if let Some(anthill) = inv.anthill() {
            if !occupied.contains(&anthill.coord) {
                for kind in BUILDABLE {
                    if kind.stats().cost.map_or(false, |c| c <= inv.food) {
                        moves.push(Move::build_unit(kind));
                    }
                }
            }
        }

        moves.push(Move::EndTurn);
        moves
    }

    // ========================================================================
    // REFEREE
    // ========================================================================

    /// Play a move as the game itself would.
    ///
    /// Same as the adversarial transition, except that ending a turn also
    /// settles the acting player's economy: workers on food pick it up,
    /// carrying workers on a depot drop it, and units standing on the enemy
    /// anthill wear down its capture health.
    pub fn play(&self, mv: &Move) -> Self {
        let mut next = transition::apply_adversarial(self, mv);
        if mv.is_end_turn() {
            next.settle_turn(self.current_player());
        }
        next
    }

    fn settle_turn(&mut self, player: Player) {
        let foods: FxHashSet<Coord> = self.food_sources().collect();
        let enemy_anthill = self.inventory(player.opponent()).anthill().map(|a| a.coord);

        let inv = self.inventory_mut(player);
        let depots: FxHashSet<Coord> = inv.depots().collect();
        let mut delivered = 0;
        let mut sieging = false;

        for unit in inv.units.iter_mut() {
            if unit.kind == UnitType::Worker {
                if !unit.carrying && foods.contains(&unit.coord) {
                    unit.carrying = true;
                } else if unit.carrying && depots.contains(&unit.coord) {
                    unit.carrying = false;
                    delivered += 1;
                }
            }
            if Some(unit.coord) == enemy_anthill {
                sieging = true;
            }
        }
        inv.food += delivered;

        if sieging {
            if let Some(hill) = self.inventory_mut(player.opponent()).anthill_mut() {
                hill.capture_health = (hill.capture_health - 1).max(0);
            }
        }
    }
}

/// Point reflection through the board center
pub fn mirror(c: Coord) -> Coord {
    Coord::new(BOARD_SIZE - 1 - c.x, BOARD_SIZE - 1 - c.y)
}

/// Breadth-first search over free cells; one move per reachable destination,
/// carrying the shortest path found.
fn generate_unit_moves(unit: &Unit, occupied: &FxHashSet<Coord>, moves: &mut Vec<Move>) {
    let allowance = unit.kind.stats().movement as usize;
    let start = unit.coord;

    let mut came_from: FxHashMap<Coord, Coord> = FxHashMap::default();
    let mut frontier = VecDeque::from([(start, 0usize)]);
    let mut order = Vec::new();

    while let Some((pos, steps)) = frontier.pop_front() {
        if steps == allowance {
            continue;
        }
        for next in pos.neighbors() {
            if next == start || occupied.contains(&next) || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, pos);
            order.push(next);
            frontier.push_back((next, steps + 1));
        }
    }

    for dest in order {
        let mut path = vec![dest];
        let mut cur = dest;
        while let Some(&prev) = came_from.get(&cur) {
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        moves.push(Move::MoveUnit(path));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PLAYER_ONE_LAST_ROW, PLAYER_TWO_FIRST_ROW};

    #[test]
    fn test_opening() {
        let game = GameState::opening();
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.winner(), None);
        for p in [Player::One, Player::Two] {
            let inv = game.inventory(p);
            assert!(inv.queen().is_some());
            assert_eq!(inv.count(UnitType::Worker), 1);
            assert_eq!(inv.tunnels().count(), 1);
        }
        assert_eq!(game.food_sources().count(), 4);
    }

    #[test]
    fn test_opening_is_mirrored() {
        let game = GameState::opening();
        let one = game.inventory(Player::One).anthill().unwrap().coord;
        let two = game.inventory(Player::Two).anthill().unwrap().coord;
        assert_eq!(mirror(one), two);

        // Each side sets up inside its own territory
        for c in &game.inventory(Player::One).constructions {
            assert!(c.coord.y <= PLAYER_ONE_LAST_ROW);
        }
        for c in &game.inventory(Player::Two).constructions {
            assert!(c.coord.y >= PLAYER_TWO_FIRST_ROW);
        }
    }

    #[test]
    fn test_legal_moves() {
        let game = GameState::opening();
        let moves = game.legal_moves();
        assert_eq!(moves.last(), Some(&Move::EndTurn));
        // No food yet, so no builds
        assert!(!moves.iter().any(|m| matches!(m, Move::Build(_))));
        // Every path starts on one of our units and stays within movement
        for mv in &moves {
            if let Move::MoveUnit(path) = mv {
                let (owner, unit) = game.unit_at(path[0]).unwrap();
                assert_eq!(owner, Player::One);
                assert!(path.len() - 1 <= unit.kind.stats().movement as usize);
                assert!(game.unit_at(*path.last().unwrap()).is_none());
            }
        }
    }

    #[test]
    fn test_moved_units_cannot_move_again() {
        let mut game = GameState::opening();
        for u in game.inventory_mut(Player::One).units.iter_mut() {
            u.has_moved = true;
        }
        let moves = game.legal_moves();
        assert_eq!(moves, vec![Move::EndTurn]);
    }

    #[test]
    fn test_build_moves_need_free_anthill_and_food() {
        let mut game = GameState::opening();
        game.inventory_mut(Player::One).food = 2;
        // Queen sits on the anthill
        assert!(!game.legal_moves().iter().any(|m| matches!(m, Move::Build(_))));

        game.inventory_mut(Player::One).units[0].coord = Coord::new(4, 0);
        let moves = game.legal_moves();
        assert!(moves.contains(&Move::build_unit(UnitType::Worker)));
        assert!(moves.contains(&Move::build_unit(UnitType::Drone)));
        assert!(!moves.contains(&Move::build_unit(UnitType::Soldier)));
    }

    #[test]
    fn test_winner_by_queen_loss() {
        let mut game = GameState::opening();
        game.inventory_mut(Player::Two)
            .units
            .retain(|u| u.kind != UnitType::Queen);
        assert_eq!(game.winner(), Some(Player::One));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_winner_by_food() {
        let mut game = GameState::opening();
        game.inventory_mut(Player::Two).food = FOOD_GOAL;
        assert_eq!(game.winner(), Some(Player::Two));
    }

    #[test]
    fn test_referee_delivers_food() {
        let mut game = GameState::opening();
        let worker_idx = 1;
        let food = Coord::new(0, 3);
        game.inventory_mut(Player::One).units[worker_idx].coord = food;

        let after = game.play(&Move::EndTurn);
        assert!(after.inventory(Player::One).units[worker_idx].carrying);
        assert_eq!(after.current_player(), Player::Two);

        // Walk the carrying worker onto the tunnel and end the turn again
        let mut back = after.clone();
        back.set_current_player(Player::One);
        back.inventory_mut(Player::One).units[worker_idx].coord = Coord::new(7, 2);
        let delivered = back.play(&Move::EndTurn);
        assert_eq!(delivered.inventory(Player::One).food, 1);
        assert!(!delivered.inventory(Player::One).units[worker_idx].carrying);
    }

    #[test]
    fn test_referee_siege() {
        let mut game = GameState::opening();
        let enemy_hill = game.inventory(Player::Two).anthill().unwrap().coord;
        // Move the enemy queen off her anthill and put our worker on it
        game.inventory_mut(Player::Two).units[0].coord = Coord::new(5, 9);
        game.inventory_mut(Player::One).units[1].coord = enemy_hill;

        let after = game.play(&Move::EndTurn);
        let hill = after.inventory(Player::Two).anthill().unwrap();
        assert_eq!(hill.capture_health, ANTHILL_CAPTURE_HEALTH - 1);
    }
}
