//! Tengen: a rules engine for the game of Go.
//!
//! This crate keeps the authoritative state of a game: it validates and
//! applies moves, removes captured stones, enforces the ko and suicide rules
//! and scores finished games by territory. Transport, persistence and
//! presentation live with the caller.
//!
//! ## Modules
//!
//! - [`constants`] - Board-size bounds and rule defaults
//! - [`point`] - Coordinates, players, stones
//! - [`error`] - Error types for moves, phases and state validation
//! - [`board`] - Board representation and group analysis
//! - [`rules`] - Move validation and execution
//! - [`scoring`] - Territory and final score
//! - [`state`] - Game state, settings and validation
//! - [`game`] - The per-game manager and public API
//! - [`gtp`] - Go Text Protocol front end
//! - [`playout`] - Random playouts for demos and stress tests
//!
//! ## Example
//!
//! ```
//! use tengen::game::Game;
//! use tengen::point::{Player, Point};
//! use tengen::state::{GameSettings, MoveType};
//!
//! let mut game = Game::new(GameSettings::with_size(9)).unwrap();
//! game.make_move(Player::Black, MoveType::PlaceStone, Some(Point::new(4, 4)))
//!     .unwrap();
//! assert_eq!(game.current_player(), Player::White);
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod gtp;
pub mod playout;
pub mod point;
pub mod rules;
pub mod scoring;
pub mod state;
