//! Feed-forward evaluation network
//!
//! One sigmoid hidden layer feeding one sigmoid output in (0, 1). The network
//! either trains online against the heuristic (backpropagation after every
//! scored leaf) or runs frozen from weights loaded off disk.

use crate::error::NetworkError;
use crate::eval::{features, heuristic_score, Evaluator, Heuristics, FEATURE_COUNT};
use crate::game::{GameState, Player};
use crate::pretrained;
use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default hidden layer width
pub const DEFAULT_HIDDEN: usize = 25;

/// Default backpropagation step size
pub const DEFAULT_LEARNING_RATE: f64 = 0.7;

// ============================================================================
// WEIGHTS
// ============================================================================

/// Network parameters.
///
/// `input_weights[h][i]` connects input `i` to hidden node `h`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkWeights {
    pub input_weights: Vec<Vec<f64>>,
    pub hidden_bias: Vec<f64>,
    pub output_weights: Vec<f64>,
    pub output_bias: f64,
}

impl NetworkWeights {
    /// Uniform random weights in [-1, 1]
    pub fn random<R: Rng>(inputs: usize, hidden: usize, rng: &mut R) -> Self {
        let mut draw = || rng.gen_range(-1.0..=1.0);
        let input_weights = (0..hidden)
            .map(|_| (0..inputs).map(|_| draw()).collect())
            .collect();
        let hidden_bias = (0..hidden).map(|_| draw()).collect();
        let output_weights = (0..hidden).map(|_| draw()).collect();
        let output_bias = draw();
        Self {
            input_weights,
            hidden_bias,
            output_weights,
            output_bias,
        }
    }

    /// The built-in 10-input, 25-hidden weight set used for inference when
    /// no weights file is configured
    pub fn pretrained() -> Self {
        let flat = &pretrained::WEIGHTS;
        let (input_flat, rest) = flat.split_at(pretrained::HIDDEN * pretrained::INPUTS);
        let (hidden_bias, rest) = rest.split_at(pretrained::HIDDEN);
        let (output_weights, rest) = rest.split_at(pretrained::HIDDEN);
        Self {
            input_weights: input_flat.chunks(pretrained::INPUTS).map(<[f64]>::to_vec).collect(),
            hidden_bias: hidden_bias.to_vec(),
            output_weights: output_weights.to_vec(),
            output_bias: rest[0],
        }
    }

    pub fn inputs(&self) -> usize {
        self.input_weights.first().map_or(0, Vec::len)
    }

    pub fn hidden(&self) -> usize {
        self.input_weights.len()
    }

    /// Check that every layer agrees on the topology
    pub fn validate(&self) -> Result<(), NetworkError> {
        let (inputs, hidden) = (self.inputs(), self.hidden());
        if hidden == 0 || inputs == 0 {
            return Err(NetworkError::ShapeMismatch("empty layer".into()));
        }
        if let Some(row) = self.input_weights.iter().position(|r| r.len() != inputs) {
            return Err(NetworkError::ShapeMismatch(format!(
                "input weight row {} has {} entries, expected {}",
                row,
                self.input_weights[row].len(),
                inputs
            )));
        }
        if self.hidden_bias.len() != hidden {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} hidden biases for {} hidden nodes",
                self.hidden_bias.len(),
                hidden
            )));
        }
        if self.output_weights.len() != hidden {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} output weights for {} hidden nodes",
                self.output_weights.len(),
                hidden
            )));
        }
        if !self.to_flat().iter().all(|w| w.is_finite()) {
            return Err(NetworkError::ShapeMismatch("non-finite weight".into()));
        }
        Ok(())
    }

    /// Flatten as input weights (row per hidden node), hidden biases,
    /// output weights, output bias.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat: Vec<f64> = self.input_weights.iter().flatten().copied().collect();
        flat.extend_from_slice(&self.hidden_bias);
        flat.extend_from_slice(&self.output_weights);
        flat.push(self.output_bias);
        flat
    }

    /// Inverse of [`to_flat`](Self::to_flat)
    pub fn from_flat(flat: &[f64], inputs: usize, hidden: usize) -> Result<Self, NetworkError> {
        let expected = hidden * inputs + 2 * hidden + 1;
        if flat.len() != expected {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} flat weights for {}x{} network, expected {}",
                flat.len(),
                inputs,
                hidden,
                expected
            )));
        }
        let (input_flat, rest) = flat.split_at(hidden * inputs);
        let (hidden_bias, rest) = rest.split_at(hidden);
        let (output_weights, rest) = rest.split_at(hidden);

        let weights = Self {
            input_weights: input_flat.chunks(inputs).map(<[f64]>::to_vec).collect(),
            hidden_bias: hidden_bias.to_vec(),
            output_weights: output_weights.to_vec(),
            output_bias: rest[0],
        };
        weights.validate()?;
        Ok(weights)
    }
}

/// Weights on disk, with a little provenance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightsFile {
    /// RFC 3339 timestamp
    pub trained_at: String,
    pub games: u32,
    /// Mean absolute error over the last training game
    pub mean_error: f64,
    pub weights: NetworkWeights,
}

impl WeightsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read weights file: {}", path.display()))?;
        let file: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse weights file: {}", path.display()))?;
        file.weights
            .validate()
            .with_context(|| format!("Invalid weights in {}", path.display()))?;
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write weights file: {}", path.display()))?;
        Ok(())
    }
}

// ============================================================================
// NETWORK
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NetworkMode {
    /// Weights are updated by [`NeuralNetwork::learn`]
    Training { learning_rate: f64 },
    /// Inference only
    Frozen,
}

#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    weights: NetworkWeights,
    mode: NetworkMode,
}

impl NeuralNetwork {
    pub fn new(weights: NetworkWeights, mode: NetworkMode) -> Result<Self, NetworkError> {
        weights.validate()?;
        Ok(Self { weights, mode })
    }

    /// Fresh trainable network
    pub fn random<R: Rng>(inputs: usize, hidden: usize, learning_rate: f64, rng: &mut R) -> Self {
        Self {
            weights: NetworkWeights::random(inputs, hidden, rng),
            mode: NetworkMode::Training { learning_rate },
        }
    }

    /// Inference-only network over loaded weights
    pub fn frozen(weights: NetworkWeights) -> Result<Self, NetworkError> {
        Self::new(weights, NetworkMode::Frozen)
    }

    pub fn weights(&self) -> &NetworkWeights {
        &self.weights
    }

    pub fn into_weights(self) -> NetworkWeights {
        self.weights
    }

    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    pub fn is_frozen(&self) -> bool {
        self.mode == NetworkMode::Frozen
    }

    /// Network output in (0, 1)
    pub fn forward(&self, inputs: &[f64]) -> Result<f64, NetworkError> {
        self.check_inputs(inputs)?;
        Ok(self.activate(inputs).1)
    }

    /// One backpropagation step toward `target` (in [0, 1]).
    ///
    /// Returns the output before the update.
    pub fn learn(&mut self, inputs: &[f64], target: f64) -> Result<f64, NetworkError> {
        let lr = match self.mode {
            NetworkMode::Training { learning_rate } => learning_rate,
            NetworkMode::Frozen => return Err(NetworkError::Frozen),
        };
        self.check_inputs(inputs)?;

        let (hidden, output) = self.activate(inputs);
        let error = target - output;
        let out_delta = output * (1.0 - output) * error;

        // Hidden deltas use the output weights as they were before this step
        let hidden_deltas: Vec<f64> = hidden
            .iter()
            .zip(&self.weights.output_weights)
            .map(|(h, w)| h * (1.0 - h) * w * out_delta)
            .collect();

        let w = &mut self.weights;
        for (row, delta) in w.input_weights.iter_mut().zip(&hidden_deltas) {
            for (weight, x) in row.iter_mut().zip(inputs) {
                *weight += lr * delta * x;
            }
        }
        for (bias, delta) in w.hidden_bias.iter_mut().zip(&hidden_deltas) {
            *bias += lr * delta;
        }
        for (weight, h) in w.output_weights.iter_mut().zip(&hidden) {
            *weight += lr * out_delta * h;
        }
        w.output_bias += lr * out_delta;

        Ok(output)
    }

    fn check_inputs(&self, inputs: &[f64]) -> Result<(), NetworkError> {
        let expected = self.weights.inputs();
        if inputs.len() != expected {
            return Err(NetworkError::InputLength {
                expected,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn activate(&self, inputs: &[f64]) -> (Vec<f64>, f64) {
        let w = &self.weights;
        let hidden: Vec<f64> = w
            .input_weights
            .iter()
            .zip(&w.hidden_bias)
            .map(|(row, bias)| sigmoid(dot(row, inputs) + bias))
            .collect();
        let output = sigmoid(dot(&w.output_weights, &hidden) + w.output_bias);
        (hidden, output)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Online training statistics for one game
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub samples: u64,
    pub total_abs_error: f64,
}

impl TrainingStats {
    pub fn record(&mut self, abs_error: f64) {
        self.samples += 1;
        self.total_abs_error += abs_error;
    }

    pub fn mean_error(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total_abs_error / self.samples as f64
        }
    }
}

/// Evaluator backed by the network.
///
/// While training, every scored state is also a training sample with the
/// heuristic as target, and the heuristic score is what the search sees.
/// Frozen, the network output is mapped back onto [-1, 1].
#[derive(Clone, Debug)]
pub struct NeuralEvaluator {
    network: NeuralNetwork,
    heuristics: Heuristics,
    stats: TrainingStats,
}

impl NeuralEvaluator {
    pub fn new(network: NeuralNetwork, heuristics: Heuristics) -> Self {
        Self {
            network,
            heuristics,
            stats: TrainingStats::default(),
        }
    }

    /// Fresh trainable network sized for the Antics feature vector
    pub fn untrained<R: Rng>(hidden: usize, learning_rate: f64, heuristics: Heuristics, rng: &mut R) -> Self {
        Self::new(
            NeuralNetwork::random(FEATURE_COUNT, hidden, learning_rate, rng),
            heuristics,
        )
    }

    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Take this game's statistics and start a fresh tally
    pub fn finish_game(&mut self) -> TrainingStats {
        std::mem::take(&mut self.stats)
    }
}

impl Evaluator<GameState> for NeuralEvaluator {
    fn score(&mut self, state: &GameState, perspective: Player) -> f64 {
        let inputs = features(state, perspective, &self.heuristics);

        if self.network.is_frozen() {
            if let Some(winner) = state.winner() {
                return if winner == perspective { 1.0 } else { -1.0 };
            }
            return match self.network.forward(&inputs) {
                Ok(out) => 2.0 * out - 1.0,
                Err(e) => {
                    tracing::warn!("network evaluation failed, using heuristic: {}", e);
                    heuristic_score(state, perspective, &self.heuristics)
                }
            };
        }

        let h = heuristic_score(state, perspective, &self.heuristics);
        let target = (h + 1.0) / 2.0;
        match self.network.learn(&inputs, target) {
            Ok(out) => self.stats.record((target - out).abs()),
            Err(e) => tracing::warn!("training step failed: {}", e),
        }
        h
    }
}

// ============================================================================
// TESTS
// ============================================================================
