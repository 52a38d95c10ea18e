//! Antics Core - Game model and adversarial search
//!
//! This crate provides everything an Antics agent needs to pick a move:
//! - Board geometry (10x10 grid, Manhattan distance)
//! - Unit stats, game state, legal moves and the referee step
//! - State transitions that never mutate their input
//! - Heuristic and neural position evaluation
//! - Depth-bounded alpha-beta search over an arena tree

pub mod board;
pub mod units;
pub mod game;
pub mod transition;
pub mod eval;
pub mod network;
mod pretrained;
pub mod search;
pub mod ai;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{approx_dist, Coord, BOARD_SIZE};
pub use units::{StructureType, UnitType, FOOD_GOAL, UNIT_STATS};
pub use game::{BuildKind, Construction, GameState, Inventory, Move, Player, Unit};
pub use eval::{heuristic_score, Evaluator, HeuristicEvaluator, Heuristics};
pub use network::{NetworkWeights, NeuralEvaluator, NeuralNetwork, TrainingStats, WeightsFile};
pub use search::{AnticsRules, Game, SearchOutcome, SearchStats, SearchTree};
pub use ai::SearchAgent;
pub use config::{AgentConfig, EvalMode, EvaluatorConfig, SearchConfig};
pub use error::{NetworkError, SearchError, TransitionError};
