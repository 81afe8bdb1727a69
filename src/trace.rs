//! Binary run traces: the grid after every attempted move of one autoplay game.
//!
//! Layout (little-endian):
//! `magic "C2K1" | version u8 | seed u64 | steps u32 | final_score u64 |
//! highest_tile u64 | ended u8 | start_unix_s u64 | elapsed_s f32 |
//! states (steps + 1) x 16 bytes | moves steps x u8 | crc32c u32`.
//!
//! States are row-major exponents, one byte per cell. Moves are
//! [`Direction`] codes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::autoplay::{game_rngs, play_random_game_with, GameSummary};
use crate::engine::{Direction, DirectionError, Grid, Score, SIZE};
use crate::game::Game;

const MAGIC: &[u8; 4] = b"C2K1";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 8 + 4 + 8 + 8 + 1 + 8 + 4;
const STATE_LEN: usize = SIZE * SIZE;
const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Game seed; spawns replay from `autoplay::game_rngs(seed).0`.
    pub seed: u64,
    pub steps: u32,
    pub final_score: Score,
    pub highest_tile: u64,
    pub ended: bool,
    pub start_unix_s: u64,
    pub elapsed_s: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub meta: Meta,
    pub states: Vec<Grid>,     // length = steps + 1
    pub moves: Vec<Direction>, // length = steps
}

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid magic or version")]
    MagicOrVersion,
    #[error("file too short or malformed")]
    Malformed,
    #[error("checksum mismatch")]
    Checksum,
    #[error("{states} states do not fit {moves} moves")]
    LengthMismatch { states: usize, moves: usize },
    #[error("bad move code: {0}")]
    InvalidMove(#[from] DirectionError),
    #[error("replay diverged at step {step}")]
    Diverged { step: usize },
    #[error("replay scored {actual}, trace says {expected}")]
    ScoreMismatch { expected: Score, actual: Score },
}

/// Collects states and moves while a game is played.
#[derive(Debug)]
pub struct RunRecorder {
    seed: u64,
    start_unix_s: u64,
    started: Instant,
    states: Vec<Grid>,
    moves: Vec<Direction>,
}

impl RunRecorder {
    pub fn new(seed: u64, initial: &Grid) -> Self {
        let mut states = Vec::with_capacity(1024);
        states.push(*initial);
        Self {
            seed,
            start_unix_s: now_unix_seconds(),
            started: Instant::now(),
            states,
            moves: Vec::with_capacity(1024),
        }
    }

    pub fn record(&mut self, direction: Direction, after: &Grid) {
        self.moves.push(direction);
        self.states.push(*after);
    }

    pub fn finish(self, game: &Game) -> Run {
        let meta = Meta {
            seed: self.seed,
            steps: self.moves.len() as u32,
            final_score: game.score(),
            highest_tile: game.grid().highest_tile(),
            ended: game.is_ended(),
            start_unix_s: self.start_unix_s,
            elapsed_s: self.started.elapsed().as_secs_f32(),
        };
        Run { meta, states: self.states, moves: self.moves }
    }
}

/// Play a random autoplay game and keep its full trace.
pub fn record_random_game(seed: u64, max_moves: u64) -> (GameSummary, Run) {
    let (mut spawn_rng, _) = game_rngs(seed);
    let initial = Game::new(&mut spawn_rng);
    let mut recorder = RunRecorder::new(seed, initial.grid());
    let mut last = initial;
    let summary = play_random_game_with(seed, max_moves, |game, direction, _| {
        recorder.record(direction, game.grid());
        last = game.clone();
    });
    (summary, recorder.finish(&last))
}

#[inline]
fn read_u32_le(bytes: &[u8]) -> Option<u32> {
    Some(u32::from_le_bytes(bytes.get(..4)?.try_into().ok()?))
}

#[inline]
fn read_u64_le(bytes: &[u8]) -> Option<u64> {
    Some(u64::from_le_bytes(bytes.get(..8)?.try_into().ok()?))
}

pub fn encode_run(run: &Run) -> Result<Vec<u8>, TraceError> {
    if run.states.len() != run.moves.len() + 1 || run.meta.steps as usize != run.moves.len() {
        return Err(TraceError::LengthMismatch { states: run.states.len(), moves: run.moves.len() });
    }
    let meta = &run.meta;
    let total = HEADER_LEN + run.states.len() * STATE_LEN + run.moves.len() + CHECKSUM_LEN;
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&meta.seed.to_le_bytes());
    buf.extend_from_slice(&meta.steps.to_le_bytes());
    buf.extend_from_slice(&meta.final_score.to_le_bytes());
    buf.extend_from_slice(&meta.highest_tile.to_le_bytes());
    buf.push(meta.ended as u8);
    buf.extend_from_slice(&meta.start_unix_s.to_le_bytes());
    buf.extend_from_slice(&meta.elapsed_s.to_bits().to_le_bytes());

    for state in &run.states {
        buf.extend_from_slice(&state.to_bytes());
    }
    buf.extend(run.moves.iter().map(|d| d.code()));

    let checksum = crc32c::crc32c(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

pub fn write_run_to_path<P: AsRef<Path>>(path: P, run: &Run) -> Result<(), TraceError> {
    let data = encode_run(run)?;
    let mut f = fs::File::create(path)?;
    f.write_all(&data)?;
    Ok(())
}

pub fn parse_run_bytes(bytes: &[u8]) -> Result<Run, TraceError> {
    if bytes.len() < HEADER_LEN + STATE_LEN + CHECKSUM_LEN {
        return Err(TraceError::Malformed);
    }

    // Validate checksum first to avoid panics while reading fields
    let (content, trailer) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let file_crc = read_u32_le(trailer).ok_or(TraceError::Malformed)?;
    if file_crc != crc32c::crc32c(content) {
        return Err(TraceError::Checksum);
    }

    if &content[..4] != MAGIC || content[4] != VERSION {
        return Err(TraceError::MagicOrVersion);
    }

    let mut off = 5;
    let seed = read_u64_le(&content[off..]).ok_or(TraceError::Malformed)?;
    off += 8;
    let steps = read_u32_le(&content[off..]).ok_or(TraceError::Malformed)?;
    off += 4;
    let final_score = read_u64_le(&content[off..]).ok_or(TraceError::Malformed)?;
    off += 8;
    let highest_tile = read_u64_le(&content[off..]).ok_or(TraceError::Malformed)?;
    off += 8;
    let ended = content[off] != 0;
    off += 1;
    let start_unix_s = read_u64_le(&content[off..]).ok_or(TraceError::Malformed)?;
    off += 8;
    let elapsed_s = f32::from_bits(read_u32_le(&content[off..]).ok_or(TraceError::Malformed)?);
    off += 4;

    let states_count = steps as usize + 1;
    let states_len = states_count.checked_mul(STATE_LEN).ok_or(TraceError::Malformed)?;
    if content.len() != off + states_len + steps as usize {
        return Err(TraceError::Malformed);
    }

    let states = content[off..off + states_len]
        .chunks_exact(STATE_LEN)
        .map(|chunk| {
            let mut cells = [0u8; STATE_LEN];
            cells.copy_from_slice(chunk);
            Grid::from_bytes(cells)
        })
        .collect();
    off += states_len;

    let moves = content[off..]
        .iter()
        .map(|&code| Direction::try_from(code))
        .collect::<Result<Vec<_>, _>>()?;

    let meta = Meta { seed, steps, final_score, highest_tile, ended, start_unix_s, elapsed_s };
    Ok(Run { meta, states, moves })
}

pub fn parse_run_file<P: AsRef<Path>>(path: P) -> Result<Run, TraceError> {
    let data = fs::read(path)?;
    parse_run_bytes(&data)
}

/// Re-simulate `run` from its seed and recorded moves, checking every state.
///
/// Returns the replayed game on success. Spawn positions depend on the RNG
/// stream, so traces only replay under the same `rand` release.
pub fn replay(run: &Run) -> Result<Game, TraceError> {
    if run.states.len() != run.moves.len() + 1 {
        return Err(TraceError::LengthMismatch { states: run.states.len(), moves: run.moves.len() });
    }
    let (mut spawn_rng, _) = game_rngs(run.meta.seed);
    let mut game = Game::new(&mut spawn_rng);
    if game.grid() != &run.states[0] {
        warn!("replay of seed {} diverged at the initial grid", run.meta.seed);
        return Err(TraceError::Diverged { step: 0 });
    }

    for (i, (&direction, expected)) in run.moves.iter().zip(&run.states[1..]).enumerate() {
        let step = i + 1;
        if game.apply_move(direction, &mut spawn_rng).is_err() || game.grid() != expected {
            warn!("replay of seed {} diverged at step {step}", run.meta.seed);
            return Err(TraceError::Diverged { step });
        }
    }

    if game.score() != run.meta.final_score {
        return Err(TraceError::ScoreMismatch { expected: run.meta.final_score, actual: game.score() });
    }
    Ok(game)
}

pub fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
