//! Game cycle: configuration, piece generation and the session controller.
//!
//! This module drives the core data structures through the falling-block
//! game loop:
//!
//! - [`SessionConfig`] - Board size, spawn anchor, rotation direction, fall speed, top-out rule
//! - [`PieceGenerator`] - Seeded source of random pieces
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameStats`] - Lines cleared, pieces locked, clear histogram
//! - [`GameSession`] - The controller owning the grid and the falling piece
//!
//! # Game Flow
//!
//! 1. A piece spawns at the spawn anchor with a random kind, orientation and palette
//! 2. Input commands and clock ticks move the piece; every move goes through
//!    [`can_place`](crate::can_place)
//! 3. When a downward move is rejected the piece locks into the grid
//! 4. Filled rows are cleared and a new piece spawns
//! 5. Repeat until the stack reaches the top (top-out)
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, GameSession, PieceSeed, SessionConfig};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
//!
//! session.apply(Command::MoveLeft);
//! session.apply(Command::Rotate);
//! session.apply(Command::HardDrop);
//!
//! while !session.is_game_over() {
//!     session.tick();
//! }
//! println!("lines cleared: {}", session.summary().lines_cleared);
//! ```

pub use self::{config::*, game_session::*, game_stats::*, piece_generator::*};

mod config;
mod game_session;
mod game_stats;
mod piece_generator;
