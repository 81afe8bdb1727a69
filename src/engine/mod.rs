//! Engine module: the 4x4 exponent grid and its transitions.
//!
//! - `Grid` is the board with ergonomic methods (`shift`, `rotate`, `is_game_over`, ...).
//! - One canonical line slide (`slide_line`) plus a quarter-turn rotation express
//!   all four directions; see [`Direction::rotations`].
//! - Free functions mirror the methods when convenient (e.g., `shift`).

pub mod grid;
mod moves;
mod rotate;
pub mod slide;
mod spawn;
mod termination;

pub use grid::{Direction, DirectionError, Exponent, Grid, Line, Score, SIZE};
pub use moves::shift;
pub use rotate::{rotate, rotate_times};
pub use slide::{self_check, slide_line, SelfCheckFailure, SlideOutcome, SLIDE_CASES};
pub use spawn::{spawn_tile, SPAWN_EXPONENT};
pub use termination::{has_adjacent_pair, is_game_over};
