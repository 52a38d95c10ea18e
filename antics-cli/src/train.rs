//! Train command - fit the evaluation network to the heuristic by self-play
//!
//! The agent searches with the heuristic while the network learns from every
//! leaf it scores. Weights are written as a `WeightsFile` that `play` can load
//! for frozen inference.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use antics_core::{AgentConfig, EvalMode, GameState, Player, SearchAgent, WeightsFile};

#[derive(Args)]
pub struct TrainArgs {
    /// Where to write the trained weights
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Continue training from an existing weights file
    #[arg(long, value_name = "FILE")]
    pub resume: Option<PathBuf>,

    /// Base agent config JSON (evaluator mode is forced to training)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Self-play games to train on
    #[arg(long, default_value = "100")]
    pub games: u32,

    /// Search depth during training
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Hidden layer width (ignored when resuming)
    #[arg(long)]
    pub hidden: Option<usize>,

    /// Backpropagation step size
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Maximum turns per self-play game
    #[arg(long, default_value = "60")]
    pub max_turns: u32,

    /// Write intermediate weights every N games (0 = only at the end)
    #[arg(long, default_value = "0")]
    pub checkpoint_every: u32,
}

pub fn run(args: TrainArgs, seed: Option<u64>) -> Result<()> {
    let config = training_config(&args, seed)?;
    let prior_games = match &args.resume {
        Some(path) => WeightsFile::load(path)?.games,
        None => 0,
    };

    let mut agent = SearchAgent::from_config(config).context("Failed to build training agent")?;
    tracing::info!(
        games = args.games,
        depth = args.depth,
        prior_games,
        "Starting training"
    );

    let pb = create_training_progress(args.games as u64)?;
    let mut last_error = 0.0;

    for game in 1..=args.games {
        let (state, history) = agent.play_game(GameState::opening(), args.max_turns);
        if let Some(stats) = agent.register_game_end(&state, Player::One) {
            last_error = stats.mean_error();
            tracing::debug!(game, moves = history.len(), samples = stats.samples, last_error);
        }
        pb.set_message(format!("error {:.4}", last_error));
        pb.inc(1);

        if args.checkpoint_every > 0 && game % args.checkpoint_every == 0 {
            save_weights(&agent, &args.output, prior_games + game, last_error)?;
        }
    }
    pb.finish_with_message(format!("error {:.4}", last_error));

    save_weights(&agent, &args.output, prior_games + args.games, last_error)?;
    println!(
        "Wrote {} (mean error {:.4} after {} games)",
        args.output.display(),
        last_error,
        prior_games + args.games
    );
    Ok(())
}

fn training_config(args: &TrainArgs, seed: Option<u64>) -> Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };
    config = config.with_depth(args.depth).with_eval_mode(EvalMode::NeuralTraining);
    config.evaluator.weights_path = args.resume.clone();
    if let Some(hidden) = args.hidden {
        config.evaluator.hidden_size = hidden;
    }
    if let Some(lr) = args.learning_rate {
        config.evaluator.learning_rate = lr;
    }
    if let Some(s) = seed {
        config.seed = Some(s);
    }
    Ok(config)
}

fn save_weights(agent: &SearchAgent, path: &Path, games: u32, mean_error: f64) -> Result<()> {
    let weights = agent
        .network_weights()
        .context("Training agent has no network")?
        .clone();
    let file = WeightsFile {
        trained_at: chrono::Utc::now().to_rfc3339(),
        games,
        mean_error,
        weights,
    };
    file.save(path)?;
    tracing::info!(path = %path.display(), games, "Saved weights");
    Ok(())
}

fn create_training_progress(total_games: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_games);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}
