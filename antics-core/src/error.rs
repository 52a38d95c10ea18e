//! Error types

use crate::board::Coord;
use crate::game::BuildKind;

/// A move that matches no production rule for the state it is applied to
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("move path is empty")]
    EmptyPath,

    #[error("no unit of the acting player at {0:?}")]
    NoUnitAt(Coord),

    #[error("destination {0:?} is occupied")]
    Occupied(Coord),

    #[error("destination {0:?} is off the board")]
    OffBoard(Coord),

    #[error("{0:?} cannot be built")]
    IllegalBuild(BuildKind),

    #[error("{kind:?} costs {cost} food but only {available} is available")]
    Unaffordable {
        kind: BuildKind,
        cost: i32,
        available: i32,
    },

    #[error("acting player has no anthill to build from")]
    NoAnthill,
}

/// Search failures that reach the caller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("no legal moves available at the root")]
    NoLegalMoves,
}

/// Neural network failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("weights do not match topology: {0}")]
    ShapeMismatch(String),

    #[error("expected {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },

    #[error("network is frozen (inference only)")]
    Frozen,
}
