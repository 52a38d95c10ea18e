//! State transitions
//!
//! Every function here clones the input state and works on the copy, so a
//! search tree is a set of independent snapshots and nothing is ever undone.
//!
//! - `apply`: lookahead variant. Units never get flagged as having acted and
//!   ending the turn does nothing.
//! - `apply_adversarial`: turn-accurate variant used by the search. Acting
//!   units are flagged, and ending the turn clears the flags and hands the
//!   move to the opponent.

use crate::board::{attackable, Coord};
use crate::error::TransitionError;
use crate::game::{BuildKind, GameState, Move, Unit};

/// Apply a move for lookahead. Invalid moves are logged and leave the state
/// unchanged.
pub fn apply(state: &GameState, mv: &Move) -> GameState {
    try_apply(state, mv).unwrap_or_else(|e| reject(state, mv, e))
}

/// Apply a move with turn bookkeeping. Invalid moves are logged and leave the
/// state unchanged.
pub fn apply_adversarial(state: &GameState, mv: &Move) -> GameState {
    try_apply_adversarial(state, mv).unwrap_or_else(|e| reject(state, mv, e))
}

pub fn try_apply(state: &GameState, mv: &Move) -> Result<GameState, TransitionError> {
    let mut next = state.clone();
    apply_in_place(&mut next, mv, false)?;
    Ok(next)
}

pub fn try_apply_adversarial(state: &GameState, mv: &Move) -> Result<GameState, TransitionError> {
    let mut next = state.clone();
    apply_in_place(&mut next, mv, true)?;
    Ok(next)
}

fn reject(state: &GameState, mv: &Move, err: TransitionError) -> GameState {
    tracing::warn!(player = ?state.current_player(), ?mv, "rejected move: {}", err);
    state.clone()
}

fn apply_in_place(state: &mut GameState, mv: &Move, adversarial: bool) -> Result<(), TransitionError> {
    match mv {
        Move::EndTurn => {
            if adversarial {
                end_turn(state);
            }
            Ok(())
        }
        Move::Build(kind) => build(state, *kind, adversarial),
        Move::MoveUnit(path) => move_unit(state, path, adversarial),
    }
}

fn build(state: &mut GameState, kind: BuildKind, adversarial: bool) -> Result<(), TransitionError> {
    let (unit_kind, cost) = match kind {
        BuildKind::Unit(t) => match t.stats().cost {
            Some(cost) => (t, cost),
            None => return Err(TransitionError::IllegalBuild(kind)),
        },
        BuildKind::Structure(_) => return Err(TransitionError::IllegalBuild(kind)),
    };

    let me = state.current_player();
    let spawn = state
        .inventory(me)
        .anthill()
        .map(|a| a.coord)
        .ok_or(TransitionError::NoAnthill)?;

    let available = state.inventory(me).food;
    if cost > available {
        return Err(TransitionError::Unaffordable {
            kind,
            cost,
            available,
        });
    }
    if state.unit_at(spawn).is_some() {
        return Err(TransitionError::Occupied(spawn));
    }

    let mut unit = Unit::new(unit_kind, spawn);
    unit.has_moved = adversarial;

    let inv = state.inventory_mut(me);
    inv.food -= cost;
    inv.units.push(unit);
    Ok(())
}

fn move_unit(
    state: &mut GameState,
    path: &[Coord],
    adversarial: bool,
) -> Result<(), TransitionError> {
    let (&from, &to) = match (path.first(), path.last()) {
        (Some(from), Some(to)) => (from, to),
        _ => return Err(TransitionError::EmptyPath),
    };
    if !to.is_valid() {
        return Err(TransitionError::OffBoard(to));
    }

    let me = state.current_player();
    let idx = state
        .inventory(me)
        .units
        .iter()
        .position(|u| u.coord == from)
        .ok_or(TransitionError::NoUnitAt(from))?;
    if to != from && state.unit_at(to).is_some() {
        return Err(TransitionError::Occupied(to));
    }

    let mover = &mut state.inventory_mut(me).units[idx];
    mover.coord = to;
    if adversarial {
        mover.has_moved = true;
    }
    let stats = mover.kind.stats();

    // Engage the first enemy in range, if any
    let enemy = state.inventory_mut(me.opponent());
    for target in attackable(to, stats.range) {
        if let Some(victim) = enemy.units.iter().position(|u| u.coord == target) {
            enemy.units[victim].health -= stats.attack;
            if enemy.units[victim].health <= 0 {
                enemy.units.remove(victim);
            }
            break;
        }
    }

    Ok(())
}

fn end_turn(state: &mut GameState) {
    let me = state.current_player();
    for unit in state.inventory_mut(me).units.iter_mut() {
        unit.has_moved = false;
    }
    state.set_current_player(me.opponent());
    state.turn += 1;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Construction, Player};
    use crate::units::{StructureType, UnitType};

    fn skirmish() -> GameState {
        let mut state = GameState::empty();
        let one = state.inventory_mut(Player::One);
        one.constructions
            .push(Construction::new(StructureType::Anthill, Coord::new(1, 1)));
        one.units.push(Unit::new(UnitType::Queen, Coord::new(0, 0)));
        one.units.push(Unit::new(UnitType::Soldier, Coord::new(4, 4)));
        one.food = 3;

        let two = state.inventory_mut(Player::Two);
        two.constructions
            .push(Construction::new(StructureType::Anthill, Coord::new(8, 8)));
        two.units.push(Unit::new(UnitType::Queen, Coord::new(9, 9)));
        two.units.push(Unit::new(UnitType::Worker, Coord::new(5, 6)));
        two.units.push(Unit::new(UnitType::Drone, Coord::new(6, 5)));
        state
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let state = skirmish();
        let snapshot = state.clone();
        let moves = [
            Move::MoveUnit(vec![Coord::new(4, 4), Coord::new(5, 4), Coord::new(5, 5)]),
            Move::build_unit(UnitType::Worker),
            Move::EndTurn,
            Move::Build(BuildKind::Structure(StructureType::Tunnel)),
        ];
        for mv in &moves {
            let _ = apply(&state, mv);
            let _ = apply_adversarial(&state, mv);
            assert_eq!(state, snapshot, "input mutated by {:?}", mv);
        }
    }

    #[test]
    fn test_build_spends_food() {
        let state = skirmish();
        let next = apply(&state, &Move::build_unit(UnitType::Worker));
        let inv = next.inventory(Player::One);
        assert_eq!(inv.food, 2);
        assert_eq!(inv.count(UnitType::Worker), 1);
        assert_eq!(inv.units_of(UnitType::Worker).next().unwrap().coord, Coord::new(1, 1));
    }

    #[test]
    fn test_invalid_builds_leave_state_unchanged() {
        let state = skirmish();
        for mv in [
            Move::Build(BuildKind::Structure(StructureType::Tunnel)),
            Move::build_unit(UnitType::Queen),
        ] {
            assert_eq!(apply(&state, &mv), state);
            assert!(matches!(
                try_apply(&state, &mv),
                Err(TransitionError::IllegalBuild(_))
            ));
        }

        let mut poor = state.clone();
        poor.inventory_mut(Player::One).food = 2;
        assert!(matches!(
            try_apply(&poor, &Move::build_unit(UnitType::Soldier)),
            Err(TransitionError::Unaffordable { cost: 3, available: 2, .. })
        ));
        assert_eq!(apply(&poor, &Move::build_unit(UnitType::Soldier)), poor);
    }

    #[test]
    fn test_build_on_occupied_anthill_rejected() {
        let mut state = skirmish();
        state.inventory_mut(Player::One).units[0].coord = Coord::new(1, 1);
        assert_eq!(
            try_apply(&state, &Move::build_unit(UnitType::Worker)),
            Err(TransitionError::Occupied(Coord::new(1, 1)))
        );
    }

    #[test]
    fn test_move_engages_one_enemy() {
        let state = skirmish();
        // Soldier ends adjacent to both the worker (5,6) and the drone (6,5)
        let mv = Move::MoveUnit(vec![Coord::new(4, 4), Coord::new(5, 4), Coord::new(5, 5)]);
        let next = apply(&state, &mv);

        let two = next.inventory(Player::Two);
        // Worker (health 2) dies to a soldier hit of 2; drone untouched.
        // (5,6) is enumerated before (6,5): dx = 0 comes before dx = 1.
        assert_eq!(two.count(UnitType::Worker), 0);
        assert_eq!(two.units_of(UnitType::Drone).next().unwrap().health, 2);
        assert_eq!(next.inventory(Player::One).units[1].coord, Coord::new(5, 5));
    }

    #[test]
    fn test_damage_without_kill() {
        let mut state = skirmish();
        state.inventory_mut(Player::One).units[1].kind = UnitType::Worker;
        let mv = Move::MoveUnit(vec![Coord::new(4, 4), Coord::new(4, 5), Coord::new(4, 6)]);
        let next = apply(&state, &mv);
        let worker = next.inventory(Player::Two).units_of(UnitType::Worker).next().unwrap();
        assert_eq!(worker.health, 1);
    }

    #[test]
    fn test_invalid_moves() {
        let state = skirmish();
        assert_eq!(
            try_apply(&state, &Move::MoveUnit(vec![])),
            Err(TransitionError::EmptyPath)
        );
        assert_eq!(
            try_apply(&state, &Move::MoveUnit(vec![Coord::new(3, 3), Coord::new(3, 4)])),
            Err(TransitionError::NoUnitAt(Coord::new(3, 3)))
        );
        assert_eq!(
            try_apply(&state, &Move::MoveUnit(vec![Coord::new(4, 4), Coord::new(5, 6)])),
            Err(TransitionError::Occupied(Coord::new(5, 6)))
        );
    }

    #[test]
    fn test_lookahead_variant_ignores_turns() {
        let state = skirmish();
        let mv = Move::MoveUnit(vec![Coord::new(4, 4), Coord::new(4, 3)]);
        let next = apply(&state, &mv);
        assert!(!next.inventory(Player::One).units[1].has_moved);

        let ended = apply(&state, &Move::EndTurn);
        assert_eq!(ended, state);
    }

    #[test]
    fn test_adversarial_flags_and_end_turn() {
        let state = skirmish();
        let mv = Move::MoveUnit(vec![Coord::new(4, 4), Coord::new(4, 3)]);
        let moved = apply_adversarial(&state, &mv);
        assert!(moved.inventory(Player::One).units[1].has_moved);

        let built = apply_adversarial(&moved, &Move::build_unit(UnitType::Worker));
        assert!(built.inventory(Player::One).units.last().unwrap().has_moved);

        let ended = apply_adversarial(&built, &Move::EndTurn);
        assert_eq!(ended.current_player(), Player::Two);
        assert_eq!(ended.turn, 1);
        assert!(ended.inventory(Player::One).units.iter().all(|u| !u.has_moved));
    }
}
