//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules, the engine state machine and the board
//! metrics. It has **no** dependencies on rendering, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for RL training)
//! - **Testable**: Unit tests for every rule
//! - **Portable**: Runs headless inside an environment server or a rollout loop
//!
//! # Module Structure
//!
//! - [`board`]: `rows x cols` grid with collision queries and line clearing
//! - [`game_state`]: the [`Game`] engine (active/next/held pieces, score, level)
//! - [`pieces`]: tetromino shape masks and the piece instance
//! - [`metrics`]: bumpiness, heights and hole counts
//! - [`rng`]: seeded LCG and the uniform piece generator
//! - [`snapshot`]: plain-data copies of the engine for observers
//! - [`error`]: precondition failures
//!
//! # Game Rules
//!
//! - **Uniform draws**: each piece kind is drawn uniformly (no bag), with a
//!   color tag drawn independently from `1..=4`
//! - **Plain rotation**: one step through the kind's orientation list, refused
//!   on collision (no wall kicks)
//! - **Hold**: once between freezes
//! - **Scoring**: one point per cleared line; `level = 1 + score / 10`
//! - **Game over**: when the freshly spawned piece overlaps the stack
//!
//! # Example
//!
//! ```
//! use rl_tetris_core::Game;
//! use rl_tetris_core::types::Action;
//!
//! let mut game = Game::new(20, 10, Some(12345)).unwrap();
//!
//! game.apply_action(Action::Right);
//! game.apply_action(Action::Rotate);
//! game.apply_action(Action::HardDrop);
//!
//! assert_eq!(game.piece_id(), 2);
//! assert_eq!(game.board().filled_cells(), 4);
//! ```

pub mod board;
pub mod error;
pub mod game_state;
pub mod metrics;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use rl_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use error::GameError;
pub use game_state::{FreezeEvent, Game};
pub use metrics::{BoardMetrics, MetricsDelta};
pub use pieces::{PieceCells, Tetromino};
pub use rng::{PieceGenerator, SimpleRng};
pub use snapshot::{GameSnapshot, PieceSnapshot};
