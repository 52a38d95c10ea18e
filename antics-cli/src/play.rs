//! Play command - match two configured agents against each other
//!
//! - run(): orchestration
//! - load_agents(), play_match(), report_results()
//! - play_single_game(), compute_match_statistics()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use antics_core::{AgentConfig, GameState, Player, SearchAgent};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Agent config JSON for the first agent (defaults if omitted)
    #[arg(long, value_name = "FILE")]
    pub first: Option<PathBuf>,

    /// Agent config JSON for the second agent (defaults if omitted)
    #[arg(long, value_name = "FILE")]
    pub second: Option<PathBuf>,

    /// Number of games to play (seats alternate)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Override the search depth of both agents
    #[arg(long)]
    pub depth: Option<u32>,

    /// Maximum turns per game before it is scored a draw
    #[arg(long, default_value = "100")]
    pub max_turns: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Which agent won a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
enum Outcome {
    First,
    Second,
    Draw,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    outcome: Outcome,
    turns: u32,
    moves: usize,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
    avg_turns: f32,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let (mut first, mut second) = load_agents(&args, seed)?;

    tracing::info!(
        "Starting match: {} games, depth {} vs {}",
        args.games,
        first.config.search.depth_limit,
        second.config.search.depth_limit
    );

    let results = play_match(&mut first, &mut second, &args);
    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// PHASES
// ============================================================================

fn load_agents(args: &PlayArgs, seed: Option<u64>) -> Result<(SearchAgent, SearchAgent)> {
    let first = load_config(args.first.as_ref(), args.depth, seed)?;
    // Distinct seeds so the agents do not mirror each other's shuffles
    let second = load_config(args.second.as_ref(), args.depth, seed.map(|s| s.wrapping_add(1)))?;

    let first = SearchAgent::from_config(first).context("Failed to build first agent")?;
    let second = SearchAgent::from_config(second).context("Failed to build second agent")?;
    Ok((first, second))
}

fn play_match(first: &mut SearchAgent, second: &mut SearchAgent, args: &PlayArgs) -> MatchResults {
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate seats for fairness
        let first_seat = if game_num % 2 == 0 { Player::One } else { Player::Two };
        let record = play_single_game(first, second, first_seat, game_num + 1, args.max_turns);

        tracing::info!(
            "Game {}: {:?} ({} turns, {} moves)",
            record.game_number,
            record.outcome,
            record.turns,
            record.moves
        );
        games.push(record);
    }

    compute_match_statistics(games)
}

fn report_results(results: &MatchResults, args: &PlayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// STEPS
// ============================================================================

fn play_single_game(
    first: &mut SearchAgent,
    second: &mut SearchAgent,
    first_seat: Player,
    game_number: usize,
    max_turns: u32,
) -> GameRecord {
    let mut state = GameState::opening();
    let mut moves = 0;

    while !state.is_over() && state.turn < max_turns {
        let agent = if state.current_player() == first_seat {
            &mut *first
        } else {
            &mut *second
        };
        let mv = agent.get_move(&state);
        state = state.play(&mv);
        moves += 1;
    }

    first.register_game_end(&state, first_seat);
    second.register_game_end(&state, first_seat.opponent());

    let outcome = match state.winner() {
        Some(p) if p == first_seat => Outcome::First,
        Some(_) => Outcome::Second,
        None => Outcome::Draw,
    };

    GameRecord {
        game_number,
        outcome,
        turns: state.turn,
        moves,
    }
}

fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |o: Outcome| games.iter().filter(|g| g.outcome == o).count();
    let first_wins = count(Outcome::First);
    let second_wins = count(Outcome::Second);
    let draws = count(Outcome::Draw);

    let total_turns: u32 = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    MatchResults {
        games,
        first_wins,
        second_wins,
        draws,
        avg_turns,
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn load_config(path: Option<&PathBuf>, depth: Option<u32>, seed: Option<u64>) -> Result<AgentConfig> {
    let mut config = match path {
        Some(p) => AgentConfig::load(p)?,
        None => AgentConfig::default(),
    };
    if let Some(d) = depth {
        config.search.depth_limit = d;
    }
    if let Some(s) = seed {
        config.seed = Some(s);
    }
    Ok(config)
}

fn percent(n: usize, total: usize) -> f32 {
    if total > 0 {
        n as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        outcome: Outcome,
        turns: u32,
        moves: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first_wins: usize,
        second_wins: usize,
        draws: usize,
        avg_turns: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        draws: results.draws,
        avg_turns: results.avg_turns,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                outcome: g.outcome,
                turns: g.turns,
                moves: g.moves,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:  {}", total);
    println!("First wins:   {} ({:.1}%)", results.first_wins, percent(results.first_wins, total));
    println!("Second wins:  {} ({:.1}%)", results.second_wins, percent(results.second_wins, total));
    println!("Draws:        {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg turns:    {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} turns ({} moves)",
            game.game_number, game.outcome, game.turns, game.moves
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
