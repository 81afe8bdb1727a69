//! Game lifecycle: a grid, its running score and the sticky ended flag.
//!
//! The RNG is always supplied by the caller, so a seeded RNG reproduces a game
//! exactly.
//!
//! ```
//! use console_2048::engine::Direction;
//! use console_2048::game::{Game, GameError};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::new(&mut rng);
//! assert_eq!(game.grid().count_empty(), 14);
//! let outcome = game.apply_move(Direction::Left, &mut rng)?;
//! assert_eq!(game.score(), outcome.score_delta);
//! # Ok::<(), GameError>(())
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{self, Direction, Grid, Score};

/// What a single `apply_move` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Whether the grid changed (and a new tile was spawned).
    pub changed: bool,
    /// Points earned from merges in this move.
    pub score_delta: Score,
    /// Whether the game is over after this move.
    pub ended: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("game has ended; start a new game")]
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    grid: Grid,
    score: Score,
    ended: bool,
}

impl Game {
    /// Start a game: empty grid, score 0, two spawned tiles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut game = Game { grid: Grid::EMPTY, score: 0, ended: false };
        game.reset(rng);
        game
    }

    /// Resume from an arbitrary grid and score; `ended` is derived from the grid.
    pub fn from_parts(grid: Grid, score: Score) -> Self {
        Game { grid, score, ended: engine::is_game_over(&grid) }
    }

    /// Re-initialize in place. Equivalent to replacing `self` with [`Game::new`].
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid = Grid::EMPTY;
        engine::spawn_tile(&mut self.grid, rng);
        engine::spawn_tile(&mut self.grid, rng);
        self.score = 0;
        self.ended = false;
    }

    /// Slide in `direction`; on change, spawn a tile and re-check termination.
    ///
    /// A move that changes nothing leaves grid and score untouched and spawns
    /// nothing. Once the game has ended every call fails with
    /// [`GameError::Ended`].
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Result<MoveOutcome, GameError> {
        if self.ended {
            return Err(GameError::Ended);
        }
        let slide = engine::shift(&mut self.grid, direction);
        if !slide.changed {
            return Ok(MoveOutcome::default());
        }
        self.score = self.score.saturating_add(slide.score);
        engine::spawn_tile(&mut self.grid, rng);
        self.ended = engine::is_game_over(&self.grid);
        Ok(MoveOutcome { changed: true, score_delta: slide.score, ended: self.ended })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}
