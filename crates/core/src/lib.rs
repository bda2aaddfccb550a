//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules and the engine state machine. It has
//! **no dependencies** on rendering, networking, logging or I/O:
//!
//! - **Deterministic**: same seed and same command/delta sequence produce the
//!   same grid, score and lines, bit for bit
//! - **Self-contained**: one RNG per engine, no globals, so any number of
//!   engines can run side by side
//! - **Portable**: runs in the headless driver, the replay checker, the bot
//!   search and the relay session alike
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision, locking, line clears and garbage
//! - [`game_state`]: the engine: active piece, timers, scoring, lifecycle
//! - [`pieces`]: compile-time rotation table and kick search
//! - [`rng`]: Park-Miller RNG and the 7-bag generator
//! - [`scoring`]: clear classification, attack table, gravity curve
//! - [`snapshot`]: read-only projection for observers
//!
//! # Game Rules
//!
//! - **7-Bag**: each group of seven draws holds every kind once
//! - **Rotation**: clockwise only, kicks tried in the order
//!   (0,0), (-1,0), (1,0), (-2,0), (2,0), (0,-1)
//! - **Lock Delay**: 500ms grounded; every successful move or rotation resets it
//! - **T-Spin**: T piece, last action a rotation, 3 of 4 corners blocked
//! - **Scoring**: line and T-spin tables, back-to-back x1.5, combo, perfect clear
//!
//! # Example
//!
//! ```
//! use stackerz_core::GameState;
//! use stackerz_core::types::Action;
//!
//! let mut game = GameState::new(12345);
//!
//! game.apply_action(Action::Right);
//! game.apply_action(Action::Rotate);
//! game.apply_action(Action::Drop);
//! game.update(16);
//!
//! // The dropped piece locked and the next one spawned.
//! assert_eq!(game.pieces_spawned(), 2);
//! assert_eq!(game.snapshot().grid.len(), 20);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::update`](game_state::GameState::update) with the elapsed
//! milliseconds. Gravity is `max(80, 700 - (level - 1) * 45)` ms per row, or
//! 100ms while soft drop is held.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use stackerz_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, GridError};
pub use game_state::{EngineConfig, GameState};
pub use pieces::{get_shape, Piece, PieceShape};
pub use rng::{PieceBag, SeededRng};
pub use scoring::{calculate_score, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
