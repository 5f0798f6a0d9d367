//! Casual chess opponent.
//!
//! This crate picks moves for a computer player of modest strength. A
//! material-and-center evaluation scores positions, and a fixed-depth
//! minimax search with alpha-beta pruning chooses among the legal moves.
//! The rules of chess themselves come from `shakmaty`, wrapped by the
//! [`rules`] module.
//!
//! ```no_run
//! use casual_chess::rules::Game;
//! use casual_chess::search::select_move;
//!
//! let mut game = Game::new();
//! let e4 = game.parse_uci("e2e4")?;
//! game.play(&e4)?;
//!
//! if let Some(reply) = select_move(&game, 3)? {
//!     game.play(&reply)?;
//! }
//! # Ok::<(), casual_chess::error::EngineError>(())
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod moveorder;
pub mod rules;
pub mod search;
pub mod session;
pub mod ui;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use evaluation::{evaluate, Score};
pub use rules::{Board, Color, Game, Move, Piece, PieceType};
pub use search::{select_move, Search};
pub use session::{Session, Status};
