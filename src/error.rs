//! Error types for the engine and play session.
//!
//! "No legal move" is not an error: searches report it as `Ok(None)`.

use shakmaty::fen::ParseFenError;
use thiserror::Error;

/// Errors that can occur while setting up positions, searching or playing.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Search depth below the minimum of one ply
    #[error("Invalid search depth: {depth} (must be at least 1)")]
    InvalidDepth { depth: u32 },

    /// FEN text could not be parsed
    #[error("Invalid FEN: {0}")]
    Fen(#[from] ParseFenError),

    /// FEN parsed but does not describe a legal position
    #[error("Illegal position: {message}")]
    InvalidPosition { message: String },

    /// Move text is not coordinate notation
    #[error("Cannot parse move '{input}' (expected coordinate notation such as e2e4)")]
    MoveSyntax { input: String },

    /// Move is well formed but not legal here
    #[error("Illegal move: {mv}")]
    IllegalMove { mv: String },

    /// Human tried to move while the computer is to play
    #[error("It is not the human player's turn")]
    NotHumanTurn,

    /// Computer asked to move when the human is to play
    #[error("It is not the computer's turn")]
    NotComputerTurn,

    /// No more moves can be made
    #[error("The game is over")]
    GameOver,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
