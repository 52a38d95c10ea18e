//! Depth-bounded alpha-beta search
//!
//! The tree is an arena of [`SearchNode`]s built fresh for every decision and
//! dropped when the decision is made. Children are produced one at a time as
//! they are visited, so a sibling behind a cutoff is never applied at all.
//!
//! Turns in Antics are made of several moves, so the side to move only
//! changes across an end-turn move: a maximizing node stays maximizing while
//! its player keeps moving units and building.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::game::{GameState, Move, Player};
use crate::transition;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Debug;
use std::time::{Duration, Instant};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Root alpha sentinel, below any evaluator score
pub const ALPHA_SENTINEL: f64 = -1000.0;

/// Root beta sentinel, above any evaluator score
pub const BETA_SENTINEL: f64 = 1000.0;

// ============================================================================
// GAME SEAM
// ============================================================================

/// Rules the search needs from a game
pub trait Game {
    type State: Clone;
    type Move: Clone + Debug;

    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Turn-accurate successor of `state`
    fn apply(&self, state: &Self::State, mv: &Self::Move) -> Self::State;

    fn is_end_turn(&self, mv: &Self::Move) -> bool;

    /// The move that passes the turn
    fn end_turn(&self) -> Self::Move;

    fn current_player(&self, state: &Self::State) -> Player;

    /// Game decided in this state
    fn is_terminal(&self, state: &Self::State) -> bool;
}

/// Antics rules
#[derive(Clone, Copy, Debug, Default)]
pub struct AnticsRules;

impl Game for AnticsRules {
    type State = GameState;
    type Move = Move;

    fn legal_moves(&self, state: &GameState) -> Vec<Move> {
        state.legal_moves()
    }

    fn apply(&self, state: &GameState, mv: &Move) -> GameState {
        transition::apply_adversarial(state, mv)
    }

    fn is_end_turn(&self, mv: &Move) -> bool {
        mv.is_end_turn()
    }

    fn end_turn(&self) -> Move {
        Move::EndTurn
    }

    fn current_player(&self, state: &GameState) -> Player {
        state.current_player()
    }

    fn is_terminal(&self, state: &GameState) -> bool {
        state.is_over()
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the search tree
#[derive(Clone, Debug)]
pub struct SearchNode<S, M> {
    /// Move that led here (None for root)
    pub mv: Option<M>,
    pub state: S,
    pub alpha: f64,
    pub beta: f64,
    pub depth: u32,
    pub maximizing: bool,
    /// Child that last improved this node's bound
    pub best_child: Option<NodeId>,
    pub parent: Option<NodeId>,
}

/// Counters for one search
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes created, root included
    pub nodes: usize,
    /// Nodes scored by the evaluator
    pub leaves: usize,
    /// Siblings skipped by cutoffs
    pub pruned: usize,
    pub max_depth_reached: u32,
    /// The deadline cut the search short
    pub timed_out: bool,
}

/// One step of the principal line and the state it is meant to be played from
#[derive(Clone, Debug)]
pub struct PlannedMove<S, M> {
    pub expected: S,
    pub mv: M,
}

/// Result of a search
#[derive(Clone, Debug)]
pub struct SearchOutcome<S, M> {
    pub mv: M,
    /// Backed-up root value
    pub value: f64,
    pub stats: SearchStats,
    /// Moves the searching player expects to play this turn, starting with `mv`
    pub plan: Vec<PlannedMove<S, M>>,
}

// ============================================================================
// SEARCH TREE
// ============================================================================

/// Alpha-beta search tree with arena allocation
pub struct SearchTree<'a, G: Game, E> {
    game: &'a G,
    evaluator: &'a mut E,
    nodes: Vec<SearchNode<G::State, G::Move>>,
    depth_limit: u32,
    time_limit: Option<Duration>,
    deadline: Option<Instant>,
    perspective: Player,
    stats: SearchStats,
}

impl<'a, G, E> SearchTree<'a, G, E>
where
    G: Game,
    E: Evaluator<G::State>,
{
    pub fn new(game: &'a G, evaluator: &'a mut E, config: &SearchConfig) -> Self {
        Self {
            game,
            evaluator,
            nodes: Vec::new(),
            depth_limit: config.depth_limit.max(1),
            time_limit: config.time_limit_ms.map(Duration::from_millis),
            deadline: None,
            perspective: Player::One,
            stats: SearchStats::default(),
        }
    }

    /// Pick a move for the player to move in `root`.
    ///
    /// Fails only when `root` has no legal moves at all.
    pub fn choose_move<R: Rng>(
        mut self,
        root: &G::State,
        rng: &mut R,
    ) -> Result<SearchOutcome<G::State, G::Move>, SearchError> {
        let moves = self.game.legal_moves(root);
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        self.perspective = self.game.current_player(root);
        self.deadline = self.time_limit.map(|limit| Instant::now() + limit);
        self.nodes.push(SearchNode {
            mv: None,
            state: root.clone(),
            alpha: ALPHA_SENTINEL,
            beta: BETA_SENTINEL,
            depth: 0,
            maximizing: true,
            best_child: None,
            parent: None,
        });

        let value = if self.game.is_terminal(root) {
            self.score_leaf(NodeId::ROOT)
        } else {
            self.expand(NodeId::ROOT, moves, rng)
        };
        self.stats.nodes = self.nodes.len();

        let plan = self.principal_line();
        let mv = match plan.first() {
            Some(step) => step.mv.clone(),
            None => {
                tracing::debug!("no child improved the root bound, ending turn");
                self.game.end_turn()
            }
        };

        tracing::debug!(
            ?mv,
            value,
            nodes = self.stats.nodes,
            leaves = self.stats.leaves,
            pruned = self.stats.pruned,
            timed_out = self.stats.timed_out,
            "search complete"
        );

        Ok(SearchOutcome {
            mv,
            value,
            stats: self.stats,
            plan,
        })
    }

    fn get(&self, id: NodeId) -> &SearchNode<G::State, G::Move> {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<G::State, G::Move> {
        &mut self.nodes[id.0]
    }

    /// Expand `id` and return its backed-up value
    fn search<R: Rng>(&mut self, id: NodeId, rng: &mut R) -> f64 {
        let depth = self.get(id).depth;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);

        if depth >= self.depth_limit || self.game.is_terminal(&self.get(id).state) {
            return self.score_leaf(id);
        }
        let moves = self.game.legal_moves(&self.get(id).state);
        if moves.is_empty() {
            return self.score_leaf(id);
        }
        self.expand(id, moves, rng)
    }

    /// Search the children of `id` reached by `moves`, in shuffled order
    fn expand<R: Rng>(&mut self, id: NodeId, mut moves: Vec<G::Move>, rng: &mut R) -> f64 {
        moves.shuffle(rng);

        let total = moves.len();
        for (i, mv) in moves.into_iter().enumerate() {
            if i > 0 && self.past_deadline() {
                self.stats.timed_out = true;
                break;
            }

            let child = self.spawn_child(id, mv);
            let value = self.search(child, rng);

            let node = self.get_mut(id);
            if node.maximizing {
                if value > node.alpha {
                    node.alpha = value;
                    node.best_child = Some(child);
                }
            } else if value < node.beta {
                node.beta = value;
                node.best_child = Some(child);
            }

            if node.alpha >= node.beta || node.alpha >= 1.0 || node.beta <= -1.0 {
                self.stats.pruned += total - i - 1;
                break;
            }
        }

        let node = self.get(id);
        if node.maximizing {
            node.alpha
        } else {
            node.beta
        }
    }

    fn spawn_child(&mut self, parent: NodeId, mv: G::Move) -> NodeId {
        let p = self.get(parent);
        let state = self.game.apply(&p.state, &mv);
        let maximizing = if self.game.is_end_turn(&mv) {
            !p.maximizing
        } else {
            p.maximizing
        };
        let child = SearchNode {
            mv: Some(mv),
            state,
            alpha: p.alpha,
            beta: p.beta,
            depth: p.depth + 1,
            maximizing,
            best_child: None,
            parent: Some(parent),
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        id
    }

    fn score_leaf(&mut self, id: NodeId) -> f64 {
        self.stats.leaves += 1;
        let perspective = self.perspective;
        self.evaluator.score(&self.nodes[id.0].state, perspective)
    }

    fn past_deadline(&self) -> bool {
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }

    /// Follow best children from the root while the searching player keeps
    /// the move. The end-turn that closes the line is included.
    fn principal_line(&self) -> Vec<PlannedMove<G::State, G::Move>> {
        let mut plan = Vec::new();
        let mut current = NodeId::ROOT;
        while let Some(child_id) = self.get(current).best_child {
            let child = self.get(child_id);
            let mv = match &child.mv {
                Some(mv) => mv.clone(),
                None => break,
            };
            let ends_turn = self.game.is_end_turn(&mv);
            plan.push(PlannedMove {
                expected: self.get(current).state.clone(),
                mv,
            });
            if ends_turn {
                break;
            }
            current = child_id;
        }
        plan
    }
}

// ============================================================================
// TESTS
// ============================================================================
