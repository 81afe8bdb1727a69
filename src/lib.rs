//! console-2048: the 2048 board transition engine
//!
//! This crate provides:
//! - A `Grid` of tile exponents with the slide/merge, rotation, spawn and
//!   termination operations (`engine` module)
//! - A `Game` that owns grid, score and the ended flag (`game` module)
//! - A random-move autoplay driver with parallel batches (`autoplay` module)
//! - A binary trace format for autoplay runs, with replay checks (`trace` module)
//!
//! Quick start:
//! ```
//! use console_2048::engine::Direction;
//! use console_2048::game::Game;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::new(&mut rng);
//! let outcome = game.apply_move(Direction::Left, &mut rng).unwrap();
//! assert_eq!(game.score(), outcome.score_delta);
//! ```
//!
//! Note: the RNG is always passed in. Use a seeded `StdRng` for reproducible
//! games and `rand::thread_rng()` otherwise.
//!
pub mod autoplay;
pub mod engine;
pub mod game;
pub mod trace;
