//! Agent configuration
//!
//! Everything an agent needs to know before its first move: how deep to
//! search, how to score leaves, and which seed drives the shuffle.

use crate::eval::Heuristics;
use crate::network::{DEFAULT_HIDDEN, DEFAULT_LEARNING_RATE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Search parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to look ahead (at least 1)
    pub depth_limit: u32,
    /// Optional time limit in milliseconds
    pub time_limit_ms: Option<u64>,
    /// Replay the principal line while the board matches it
    pub reuse_plan: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: 3,
            time_limit_ms: None,
            reuse_plan: true,
        }
    }
}

/// How leaves are scored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalMode {
    /// Hand-tuned heuristic only
    #[default]
    Heuristic,
    /// Heuristic drives the search while the network learns from it
    NeuralTraining,
    /// Frozen network loaded from `weights_path`
    NeuralInference,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub mode: EvalMode,
    pub hidden_size: usize,
    pub learning_rate: f64,
    /// Weights file; required for inference, optional starting point for training
    pub weights_path: Option<PathBuf>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            mode: EvalMode::Heuristic,
            hidden_size: DEFAULT_HIDDEN,
            learning_rate: DEFAULT_LEARNING_RATE,
            weights_path: None,
        }
    }
}

/// Agent configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub search: SearchConfig,
    pub evaluator: EvaluatorConfig,
    pub heuristics: Heuristics,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create config for a given search depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.search.depth_limit = depth;
        self
    }

    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.search.time_limit_ms = Some(ms);
        self
    }

    pub fn with_eval_mode(mut self, mode: EvalMode) -> Self {
        self.evaluator.mode = mode;
        self
    }

    pub fn with_weights(mut self, path: impl Into<PathBuf>) -> Self {
        self.evaluator.weights_path = Some(path.into());
        self
    }

    /// Set custom heuristics
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        if config.search.depth_limit == 0 {
            tracing::warn!(path = %path.display(), "depth_limit 0 will be raised to 1");
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
