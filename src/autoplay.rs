//! Random-move autoplay: plays whole games with uniformly random directions.
//!
//! Every game owns two RNGs derived from its seed: one for tile spawns and one
//! for picking directions. Keeping them apart lets a recorded run be replayed
//! from the spawn seed and the move list alone (see [`crate::trace::replay`]).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::{Direction, Exponent, Score, SIZE};
use crate::game::{Game, GameError, MoveOutcome};

const POLICY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Knobs for a batch of autoplay games. Missing TOML keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    /// Number of games to play.
    pub games: u64,
    /// Base seed; game `i` uses `seed + i`.
    pub seed: u64,
    /// Cap on attempted moves per game. Games hitting it are reported as unfinished.
    pub max_moves: u64,
    /// Worker threads (None uses the rayon default).
    pub threads: Option<usize>,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self { games: 100, seed: 0, max_moves: 100_000, threads: None }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AutoplayError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl AutoplayConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, AutoplayError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Result of one finished (or capped) game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    /// Directions drawn, including ones that moved nothing.
    pub attempts: u64,
    /// Directions that changed the grid.
    pub moves: u64,
    pub score: Score,
    pub highest_tile: u64,
    /// False when the game stopped at `max_moves` instead of game over.
    pub ended: bool,
    pub final_rows: [[Exponent; SIZE]; SIZE],
}

/// Aggregate over a batch of games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub games: u64,
    pub finished: u64,
    pub total_moves: u64,
    pub best_score: Score,
    pub mean_score: f64,
    /// Highest tile reached -> number of games.
    pub highest_tiles: BTreeMap<u64, u64>,
    pub summaries: Vec<GameSummary>,
}

/// Spawn and policy RNGs for a game seed.
pub fn game_rngs(seed: u64) -> (StdRng, StdRng) {
    (StdRng::seed_from_u64(seed), StdRng::seed_from_u64(seed ^ POLICY_SEED_SALT))
}

/// Play one game with random directions until it ends or `max_moves` attempts.
///
/// `on_step` sees every attempted direction with its outcome and the game after it.
pub fn play_random_game_with<F>(seed: u64, max_moves: u64, mut on_step: F) -> GameSummary
where
    F: FnMut(&Game, Direction, &MoveOutcome),
{
    let (mut spawn_rng, mut policy_rng) = game_rngs(seed);
    let mut game = Game::new(&mut spawn_rng);
    let mut attempts = 0;
    let mut moves = 0;

    while attempts < max_moves {
        let direction: Direction = policy_rng.gen();
        let outcome = match game.apply_move(direction, &mut spawn_rng) {
            Ok(outcome) => outcome,
            Err(GameError::Ended) => {
                debug_assert!(false, "seed={seed}: move attempted after game over");
                break;
            }
        };
        attempts += 1;
        if outcome.changed {
            moves += 1;
        }
        on_step(&game, direction, &outcome);
        if outcome.ended {
            break;
        }
    }

    if !game.is_ended() {
        warn!("game seed={seed} stopped at move cap {max_moves} with score {}", game.score());
    }
    let summary = GameSummary {
        seed,
        attempts,
        moves,
        score: game.score(),
        highest_tile: game.grid().highest_tile(),
        ended: game.is_ended(),
        final_rows: game.grid().rows(),
    };
    debug!(
        "game seed={} score={} highest={} moves={}/{}",
        summary.seed, summary.score, summary.highest_tile, summary.moves, summary.attempts
    );
    summary
}

pub fn play_random_game(seed: u64, max_moves: u64) -> GameSummary {
    play_random_game_with(seed, max_moves, |_, _, _| {})
}

/// Play `config.games` independent games in parallel.
///
/// Each game lives entirely on one worker. `on_game_done` runs once per game,
/// from whichever worker finished it.
pub fn run_batch<F>(config: &AutoplayConfig, on_game_done: F) -> Result<BatchReport, AutoplayError>
where
    F: Fn(&GameSummary) + Sync,
{
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = config.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;

    let summaries: Vec<GameSummary> = pool.install(|| {
        (0..config.games as usize)
            .into_par_iter()
            .map(|i| {
                let summary = play_random_game(config.seed.wrapping_add(i as u64), config.max_moves);
                on_game_done(&summary);
                summary
            })
            .collect()
    });

    let report = summarize(summaries);
    info!(
        "played {} games ({} finished): best score {}, mean score {:.1}",
        report.games, report.finished, report.best_score, report.mean_score
    );
    Ok(report)
}

fn summarize(summaries: Vec<GameSummary>) -> BatchReport {
    let games = summaries.len() as u64;
    let mut highest_tiles = BTreeMap::new();
    for s in &summaries {
        *highest_tiles.entry(s.highest_tile).or_insert(0) += 1;
    }
    let total_score: Score = summaries.iter().map(|s| s.score).sum();
    BatchReport {
        games,
        finished: summaries.iter().filter(|s| s.ended).count() as u64,
        total_moves: summaries.iter().map(|s| s.moves).sum(),
        best_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
        mean_score: if games == 0 { 0.0 } else { total_score as f64 / games as f64 },
        highest_tiles,
        summaries,
    }
}
