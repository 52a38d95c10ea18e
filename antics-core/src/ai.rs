//! Search-driven Antics agent

use crate::config::{AgentConfig, EvalMode};
use crate::error::SearchError;
use crate::eval::{heuristic_score, Evaluator, HeuristicEvaluator, FEATURE_COUNT};
use crate::game::{GameState, Move, Player};
use crate::network::{NetworkMode, NetworkWeights, NeuralEvaluator, NeuralNetwork, TrainingStats, WeightsFile};
use crate::search::{AnticsRules, PlannedMove, SearchOutcome, SearchStats, SearchTree};
use anyhow::Result;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Upper bound on moves in one turn, used to cap self-play
const MAX_MOVES_PER_TURN: usize = 32;

// ============================================================================
// EVALUATOR SELECTION
// ============================================================================

/// Leaf scorer chosen by [`EvalMode`]
#[derive(Clone, Debug)]
pub enum AgentEvaluator {
    Heuristic(HeuristicEvaluator),
    Neural(NeuralEvaluator),
}

impl Evaluator<GameState> for AgentEvaluator {
    fn score(&mut self, state: &GameState, perspective: Player) -> f64 {
        match self {
            AgentEvaluator::Heuristic(e) => e.score(state, perspective),
            AgentEvaluator::Neural(e) => e.score(state, perspective),
        }
    }
}

// ============================================================================
// SEARCH AGENT
// ============================================================================

/// Alpha-beta agent that plays one move per call
pub struct SearchAgent {
    pub config: AgentConfig,
    evaluator: AgentEvaluator,
    /// Rest of the line found by the last search
    plan: VecDeque<PlannedMove<GameState, Move>>,
    rng: ChaCha8Rng,
    searches: u64,
    games_played: u32,
    last_stats: Option<SearchStats>,
}

impl SearchAgent {
    /// Heuristic agent at the given depth
    pub fn new(depth: u32) -> Self {
        let config = AgentConfig::default().with_depth(depth);
        let evaluator = AgentEvaluator::Heuristic(HeuristicEvaluator::new(config.heuristics.clone()));
        Self::with_evaluator(config, evaluator)
    }

    pub fn with_seed(depth: u32, seed: u64) -> Self {
        let config = AgentConfig::default().with_depth(depth).with_seed(seed);
        let evaluator = AgentEvaluator::Heuristic(HeuristicEvaluator::new(config.heuristics.clone()));
        Self::with_evaluator(config, evaluator)
    }

    /// Build an agent from configuration, loading weights if the evaluator
    /// mode needs them.
    pub fn from_config(config: AgentConfig) -> Result<Self> {
        let mut rng = seeded_rng(config.seed);
        let heuristics = config.heuristics.clone();
        let ev = &config.evaluator;

        let evaluator = match ev.mode {
            EvalMode::Heuristic => AgentEvaluator::Heuristic(HeuristicEvaluator::new(heuristics)),
            EvalMode::NeuralTraining => {
                let network = match &ev.weights_path {
                    Some(path) => {
                        let file = WeightsFile::load(path)?;
                        tracing::info!(path = %path.display(), games = file.games, "resuming training");
                        NeuralNetwork::new(
                            file.weights,
                            NetworkMode::Training {
                                learning_rate: ev.learning_rate,
                            },
                        )?
                    }
                    None => NeuralNetwork::random(FEATURE_COUNT, ev.hidden_size, ev.learning_rate, &mut rng),
                };
                AgentEvaluator::Neural(NeuralEvaluator::new(network, heuristics))
            }
            EvalMode::NeuralInference => {
                let weights = match &ev.weights_path {
                    Some(path) => {
                        let file = WeightsFile::load(path)?;
                        tracing::info!(path = %path.display(), games = file.games, "loaded frozen network");
                        file.weights
                    }
                    None => {
                        tracing::info!("using built-in network weights");
                        NetworkWeights::pretrained()
                    }
                };
                AgentEvaluator::Neural(NeuralEvaluator::new(NeuralNetwork::frozen(weights)?, heuristics))
            }
        };

        let mut agent = Self::with_evaluator(config, evaluator);
        agent.rng = rng;
        Ok(agent)
    }

    pub fn with_evaluator(config: AgentConfig, evaluator: AgentEvaluator) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            config,
            evaluator,
            plan: VecDeque::new(),
            rng,
            searches: 0,
            games_played: 0,
            last_stats: None,
        }
    }

    /// Decide the next move.
    ///
    /// Follows the stored line while the board is exactly where the last
    /// search expected it to be; otherwise searches again. With nothing to
    /// search the agent ends its turn.
    pub fn get_move(&mut self, state: &GameState) -> Move {
        if let Some(step) = self.plan.pop_front() {
            if step.expected == *state {
                tracing::debug!(mv = ?step.mv, "following planned line");
                return step.mv;
            }
            tracing::debug!("board left the planned line, searching again");
            self.plan.clear();
        }

        match self.search(state) {
            Ok(outcome) => {
                self.last_stats = Some(outcome.stats);
                if self.config.search.reuse_plan {
                    self.plan = outcome.plan.into_iter().skip(1).collect();
                }
                outcome.mv
            }
            Err(e) => {
                tracing::warn!(player = ?state.current_player(), "{}, ending turn", e);
                Move::EndTurn
            }
        }
    }

    /// Run one search without touching the stored line
    pub fn search(&mut self, state: &GameState) -> Result<SearchOutcome<GameState, Move>, SearchError> {
        self.searches += 1;
        SearchTree::new(&AnticsRules, &mut self.evaluator, &self.config.search).choose_move(state, &mut self.rng)
    }

    /// Bookkeeping once a game is over. Returns the training statistics of
    /// the finished game when the network is learning.
    pub fn register_game_end(&mut self, state: &GameState, me: Player) -> Option<TrainingStats> {
        self.plan.clear();
        self.games_played += 1;

        let won = state.winner().map(|w| w == me);
        tracing::info!(games = self.games_played, ?won, turns = state.turn, "game over");

        match &mut self.evaluator {
            AgentEvaluator::Neural(e) if !e.network().is_frozen() => {
                let stats = e.finish_game();
                tracing::info!(
                    samples = stats.samples,
                    mean_error = stats.mean_error(),
                    "training game complete"
                );
                Some(stats)
            }
            _ => None,
        }
    }

    /// Play both sides from `initial` until someone wins or `max_turns`
    /// turns have passed
    pub fn play_game(&mut self, initial: GameState, max_turns: u32) -> (GameState, Vec<Move>) {
        let mut state = initial;
        let mut history = Vec::new();
        let max_moves = max_turns as usize * MAX_MOVES_PER_TURN;

        while !state.is_over() && state.turn < max_turns && history.len() < max_moves {
            let mv = self.get_move(&state);
            state = state.play(&mv);
            history.push(mv);
        }

        (state, history)
    }

    /// Heuristic value of a position for the player to move
    pub fn evaluate(&self, state: &GameState) -> f64 {
        heuristic_score(state, state.current_player(), &self.config.heuristics)
    }

    /// Current network weights, if the agent uses a network
    pub fn network_weights(&self) -> Option<&NetworkWeights> {
        match &self.evaluator {
            AgentEvaluator::Neural(e) => Some(e.network().weights()),
            AgentEvaluator::Heuristic(_) => None,
        }
    }

    pub fn planned_moves(&self) -> usize {
        self.plan.len()
    }

    pub fn searches(&self) -> u64 {
        self.searches
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::FOOD_GOAL;

    fn simple_game() -> GameState {
        GameState::opening()
    }

    #[test]
    fn test_agent_returns_legal_move() {
        let game = simple_game();
        let mut ai = SearchAgent::with_seed(2, 42);
        let mv = ai.get_move(&game);
        assert!(game.legal_moves().contains(&mv));
        assert_eq!(ai.searches(), 1);
        assert!(ai.last_stats().is_some());
    }

    #[test]
    fn test_follows_plan_without_searching() {
        let mut found = false;
        for seed in 0..20 {
            let game = simple_game();
            let mut ai = SearchAgent::with_seed(3, seed);
            let first = ai.get_move(&game);
            if ai.planned_moves() == 0 {
                continue;
            }
            found = true;

            let next = game.play(&first);
            let second = ai.get_move(&next);
            assert_eq!(ai.searches(), 1, "seed {}", seed);
            assert!(next.legal_moves().contains(&second));
            break;
        }
        assert!(found, "no seed produced a multi-move line");
    }

    #[test]
    fn test_leaving_plan_triggers_search() {
        for seed in 0..20 {
            let game = simple_game();
            let mut ai = SearchAgent::with_seed(3, seed);
            ai.get_move(&game);
            if ai.planned_moves() == 0 {
                continue;
            }
            // Same position again: not where the plan expects us to be
            ai.get_move(&game);
            assert_eq!(ai.searches(), 2);
            return;
        }
        panic!("no seed produced a multi-move line");
    }

    #[test]
    fn test_plan_reuse_disabled() {
        let game = simple_game();
        let mut config = AgentConfig::default().with_depth(3).with_seed(1);
        config.search.reuse_plan = false;
        let mut ai = SearchAgent::from_config(config).unwrap();
        let mv = ai.get_move(&game);
        assert_eq!(ai.planned_moves(), 0);
        ai.get_move(&game.play(&mv));
        assert_eq!(ai.searches(), 2);
    }

    #[test]
    fn test_finished_game_ends_turn() {
        let mut game = simple_game();
        game.inventory_mut(Player::Two).food = FOOD_GOAL;
        let mut ai = SearchAgent::with_seed(2, 0);
        assert_eq!(ai.get_move(&game), Move::EndTurn);
    }

    #[test]
    fn test_play_game() {
        let game = simple_game();
        let mut ai = SearchAgent::with_seed(1, 5);
        let (final_state, history) = ai.play_game(game, 6);

        assert!(!history.is_empty());
        assert!(final_state.is_over() || final_state.turn >= 6);
    }

    #[test]
    fn test_training_agent_reports_stats() {
        let config = AgentConfig::default()
            .with_depth(1)
            .with_seed(3)
            .with_eval_mode(EvalMode::NeuralTraining);
        let mut ai = SearchAgent::from_config(config).unwrap();
        let before = ai.network_weights().unwrap().clone();

        let (state, _) = ai.play_game(simple_game(), 4);
        let stats = ai.register_game_end(&state, Player::One).unwrap();
        assert!(stats.samples > 0);
        assert_ne!(ai.network_weights().unwrap(), &before);
        assert_eq!(ai.games_played(), 1);
    }

    #[test]
    fn test_heuristic_agent_has_no_training_stats() {
        let mut ai = SearchAgent::new(1);
        assert!(ai.network_weights().is_none());
        assert!(ai.register_game_end(&simple_game(), Player::One).is_none());
    }

    #[test]
    fn test_inference_defaults_to_builtin_weights() {
        let config = AgentConfig::default()
            .with_depth(2)
            .with_seed(4)
            .with_eval_mode(EvalMode::NeuralInference);
        let mut ai = SearchAgent::from_config(config).unwrap();
        assert_eq!(ai.network_weights(), Some(&NetworkWeights::pretrained()));

        let game = simple_game();
        let mv = ai.get_move(&game);
        assert!(game.legal_moves().contains(&mv));
        assert!(ai.register_game_end(&game, Player::One).is_none());
    }

    #[test]
    fn test_inference_missing_weights_file_fails() {
        let config = AgentConfig::default()
            .with_eval_mode(EvalMode::NeuralInference)
            .with_weights(std::env::temp_dir().join("antics-no-such-weights.json"));
        assert!(SearchAgent::from_config(config).is_err());
    }

    #[test]
    fn test_evaluate_in_range() {
        let ai = SearchAgent::new(1);
        let v = ai.evaluate(&simple_game());
        assert!((-1.0..=1.0).contains(&v));
    }
}
