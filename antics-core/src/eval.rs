//! Position evaluation

use crate::board::{approx_dist, Coord};
use crate::game::{GameState, Player};
use crate::units::UnitType;
use serde::{Deserialize, Serialize};

/// Anything that can score a state from one player's point of view.
///
/// Scores are in [-1, 1]: 1 is a won game, -1 a lost one.
pub trait Evaluator<S> {
    fn score(&mut self, state: &S, perspective: Player) -> f64;
}

/// Score returned when the enemy queen is gone
pub const NEAR_WIN: f64 = 0.95;

/// Score returned when we have no economy and no army left
pub const NEAR_LOSS: f64 = -0.95;

/// Stand-in distance when the target of a distance term does not exist
const FAR: i32 = 20;

/// Unit count at which the colony is considered overbuilt
const ANT_CAP: usize = 4;

/// Number of inputs produced by [`features`]
pub const FEATURE_COUNT: usize = 10;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Reward for having exactly one worker
    pub worker_weight: f64,
    /// Added to the enemy side for each worker beyond the first
    pub extra_worker_penalty: f64,
    /// Reward for having exactly one soldier (melee or ranged)
    pub soldier_weight: f64,
    /// Per unit of stored food
    pub food_weight: f64,
    /// Reward for a worker carrying food
    pub carrying_weight: f64,
    /// Soldier closing in on enemy workers or the queen
    pub soldier_proximity_weight: f64,
    /// Worker closing in on food, or on a depot when carrying
    pub worker_proximity_weight: f64,
    /// Queen staying near her anthill
    pub queen_home_weight: f64,
    /// Per unit of enemy food
    pub enemy_food_weight: f64,
    /// Per enemy unit
    pub enemy_unit_weight: f64,
    /// Per point of enemy queen health
    pub enemy_queen_health_weight: f64,
    /// Preferred soldier distance from the enemy queen
    pub ideal_distance_offset: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            worker_weight: 5.0,
            extra_worker_penalty: 2.0,
            soldier_weight: 4.0,
            food_weight: 2.0,
            carrying_weight: 1.0,
            soldier_proximity_weight: 1.0,
            worker_proximity_weight: 0.5,
            queen_home_weight: 0.25,
            enemy_food_weight: 3.0,
            enemy_unit_weight: 2.0,
            enemy_queen_health_weight: 1.0,
            ideal_distance_offset: 3,
        }
    }
}

/// Heuristic evaluator
#[derive(Clone, Debug, Default)]
pub struct HeuristicEvaluator {
    pub heuristics: Heuristics,
}

impl HeuristicEvaluator {
    pub fn new(heuristics: Heuristics) -> Self {
        Self { heuristics }
    }
}

impl Evaluator<GameState> for HeuristicEvaluator {
    fn score(&mut self, state: &GameState, perspective: Player) -> f64 {
        heuristic_score(state, perspective, &self.heuristics)
    }
}

/// Evaluate a position from `perspective`'s point of view
pub fn heuristic_score(state: &GameState, perspective: Player, heuristics: &Heuristics) -> f64 {
    // Terminal states first
    match state.winner() {
        Some(p) if p == perspective => return 1.0,
        Some(_) => return -1.0,
        None => {}
    }

    let mine = state.inventory(perspective);
    let theirs = state.inventory(perspective.opponent());

    let enemy_queen = match theirs.queen() {
        Some(q) => q,
        None => return NEAR_WIN,
    };

    let workers = mine.count(UnitType::Worker);
    let soldiers: Vec<_> = mine.units.iter().filter(|u| u.kind.is_soldier()).collect();
    if workers == 0 && mine.food == 0 && soldiers.is_empty() {
        return NEAR_LOSS;
    }

    let worker_term = if workers == 1 { 1.0 } else { 0.0 };
    let soldier_term = if soldiers.len() == 1 { 1.0 } else { 0.0 };
    let extra_workers = workers.saturating_sub(1) as f64;

    let soldier_dist = soldiers.first().map_or(FAR, |s| {
        nearest(s.coord, theirs.units_of(UnitType::Worker).map(|u| u.coord)).unwrap_or_else(|| {
            (approx_dist(s.coord, enemy_queen.coord) - heuristics.ideal_distance_offset).abs()
        })
    });

    let (worker_dist, carrying) = worker_target_distance(state, perspective);

    let queen_dist = match (mine.queen(), mine.anthill()) {
        (Some(q), Some(hill)) => approx_dist(q.coord, hill.coord).max(1),
        _ => FAR,
    };

    let our_points = heuristics.worker_weight * worker_term
        + heuristics.soldier_weight * soldier_term
        + heuristics.food_weight * mine.food as f64
        + heuristics.carrying_weight * if carrying { 1.0 } else { 0.0 }
        + heuristics.soldier_proximity_weight * bounded(soldier_dist)
        + heuristics.worker_proximity_weight * bounded(worker_dist)
        + heuristics.queen_home_weight * bounded(queen_dist);

    let enemy_points = heuristics.enemy_food_weight * theirs.food as f64
        + heuristics.enemy_unit_weight * theirs.units.len() as f64
        + heuristics.enemy_queen_health_weight * enemy_queen.health.max(0) as f64
        + heuristics.extra_worker_penalty * extra_workers;

    let total = our_points + enemy_points;
    if total <= f64::EPSILON {
        return 0.0;
    }
    ((our_points - enemy_points) / total).clamp(-1.0, 1.0)
}

/// Network inputs for a position, each within [-1, 1]
pub fn features(state: &GameState, perspective: Player, heuristics: &Heuristics) -> [f64; FEATURE_COUNT] {
    let mine = state.inventory(perspective);
    let theirs = state.inventory(perspective.opponent());

    let winner = match state.winner() {
        Some(p) if p == perspective => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    };

    let queen_home = match (mine.queen(), mine.anthill()) {
        (Some(q), Some(hill)) => 1.0 / approx_dist(q.coord, hill.coord).max(2) as f64,
        _ => 0.0,
    };

    let overbuilt = flag(mine.units.len() >= ANT_CAP);
    let workers = mine.count(UnitType::Worker);
    let ranged: Vec<_> = mine.units_of(UnitType::RangedSoldier).collect();

    let ranged_dist = match ranged.first() {
        Some(r) => nearest(r.coord, theirs.units_of(UnitType::Worker).map(|u| u.coord))
            .or_else(|| {
                theirs.queen().map(|q| {
                    (approx_dist(r.coord, q.coord) - heuristics.ideal_distance_offset).abs()
                })
            })
            .unwrap_or(0),
        None => FAR,
    };

    let (worker_dist, carrying) = worker_target_distance(state, perspective);

    let enemy_queen_health = theirs
        .queen()
        .map_or(0.0, |q| q.health.max(0) as f64 / UnitType::Queen.stats().health as f64);

    let ours = (2 * mine.food + carrying as i32) as f64;
    let their_food = (3 * theirs.food) as f64;
    let food_balance = (ours - their_food) / (ours + their_food).max(1.0);

    let enemy_units = theirs.units.len().min(ANT_CAP) as f64 / ANT_CAP as f64;

    [
        winner,
        queen_home,
        overbuilt,
        flag(workers == 1),
        flag(ranged.len() == 1),
        bounded(ranged_dist),
        bounded(worker_dist),
        enemy_queen_health,
        food_balance,
        enemy_units,
    ]
}

/// Distance from the first worker to its current target (food when empty,
/// nearest depot when carrying), plus whether it carries food.
fn worker_target_distance(state: &GameState, perspective: Player) -> (i32, bool) {
    let mine = state.inventory(perspective);
    match mine.units_of(UnitType::Worker).next() {
        Some(w) if w.carrying => (nearest(w.coord, mine.depots()).unwrap_or(FAR), true),
        Some(w) => (nearest(w.coord, state.food_sources()).unwrap_or(FAR), false),
        None => (FAR, false),
    }
}

fn nearest(from: Coord, targets: impl Iterator<Item = Coord>) -> Option<i32> {
    targets.map(|t| approx_dist(from, t)).min()
}

/// Map a distance onto (0, 1]
fn bounded(distance: i32) -> f64 {
    1.0 / (distance.max(0) as f64 + 1.0)
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Construction, Unit};
    use crate::units::StructureType;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn simple_game() -> GameState {
        GameState::opening()
    }

    #[test]
    fn test_evaluate_symmetric() {
        let game = simple_game();
        let h = Heuristics::default();
        let one = heuristic_score(&game, Player::One, &h);
        let two = heuristic_score(&game, Player::Two, &h);
        assert!((one - two).abs() < 1e-12, "{} vs {}", one, two);
    }

    #[test]
    fn test_win_and_loss() {
        let mut game = simple_game();
        game.inventory_mut(Player::One).food = crate::units::FOOD_GOAL;
        let h = Heuristics::default();
        assert_eq!(heuristic_score(&game, Player::One, &h), 1.0);
        assert_eq!(heuristic_score(&game, Player::Two, &h), -1.0);
    }

    #[test]
    fn test_enemy_queen_removed_is_near_win() {
        let mut game = simple_game();
        game.inventory_mut(Player::Two)
            .units
            .retain(|u| u.kind != UnitType::Queen);
        assert!(heuristic_score(&game, Player::One, &Heuristics::default()) >= 0.9);
    }

    #[test]
    fn test_no_economy_is_near_loss() {
        let mut game = simple_game();
        game.inventory_mut(Player::One)
            .units
            .retain(|u| u.kind == UnitType::Queen);
        game.inventory_mut(Player::One).food = 0;
        assert!(heuristic_score(&game, Player::One, &Heuristics::default()) <= -0.9);
    }

    #[test]
    fn test_extra_workers_penalized() {
        let game = simple_game();
        let h = Heuristics::default();
        let base = heuristic_score(&game, Player::One, &h);

        let mut crowded = game.clone();
        crowded
            .inventory_mut(Player::One)
            .units
            .push(Unit::new(UnitType::Worker, Coord::new(5, 2)));
        assert!(heuristic_score(&crowded, Player::One, &h) < base);
    }

    #[test]
    fn test_worker_prefers_food() {
        let game = simple_game();
        let h = Heuristics::default();
        let far = heuristic_score(&game, Player::One, &h);

        // Worker starts on the tunnel at (7, 2); food sits at (9, 2)
        let mut near = game.clone();
        near.inventory_mut(Player::One).units[1].coord = Coord::new(8, 2);
        assert!(heuristic_score(&near, Player::One, &h) > far);
    }

    #[test]
    fn test_ideal_distance_offset_is_configurable() {
        let mut game = simple_game();
        let queen = game.inventory(Player::Two).queen().unwrap().coord;
        // Ranged soldier exactly two cells from the enemy queen, no enemy workers
        game.inventory_mut(Player::Two)
            .units
            .retain(|u| u.kind == UnitType::Queen);
        game.inventory_mut(Player::One)
            .units
            .push(Unit::new(UnitType::RangedSoldier, Coord::new(queen.x - 2, queen.y)));

        let two = Heuristics {
            ideal_distance_offset: 2,
            ..Default::default()
        };
        let three = Heuristics::default();
        assert!(heuristic_score(&game, Player::One, &two) > heuristic_score(&game, Player::One, &three));
    }

    #[test]
    fn test_score_bounded_over_playouts() {
        let h = Heuristics::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let mut state = simple_game();
            state.inventory_mut(Player::One).food = 4;
            state.inventory_mut(Player::Two).food = 4;
            for _ in 0..60 {
                for p in [Player::One, Player::Two] {
                    let s = heuristic_score(&state, p, &h);
                    assert!((-1.0..=1.0).contains(&s), "score {} out of range", s);
                    for f in features(&state, p, &h) {
                        assert!((-1.0..=1.0).contains(&f), "feature {} out of range", f);
                    }
                }
                let moves = state.legal_moves();
                match moves.choose(&mut rng) {
                    Some(mv) => state = state.play(mv),
                    None => break,
                }
            }
        }
    }

    #[test]
    fn test_features_shape() {
        let mut game = simple_game();
        game.add_neutral(Construction::new(StructureType::Grass, Coord::new(4, 4)));
        let f = features(&game, Player::One, &Heuristics::default());
        assert_eq!(f.len(), FEATURE_COUNT);
        assert_eq!(f[0], 0.0);
        assert_eq!(f[3], 1.0); // exactly one worker
        assert_eq!(f[7], 1.0); // enemy queen at full health
    }
}
