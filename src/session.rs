//! A human-versus-computer game.
//!
//! The session owns the game, decides whose turn it is, and produces the
//! status line shown to the player. It does no rendering and no waiting;
//! interactive callers add their own think delay before `computer_move`.

use std::fmt;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::rules::{Color, Game, Move, Outcome};
use crate::search::Search;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    HumanToMove,
    ComputerToMove,
    Checkmate { winner: Color },
    Draw,
    NewGame,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::HumanToMove => f.write_str("Your Turn"),
            Status::ComputerToMove => f.write_str("Thinking..."),
            Status::Checkmate { winner } => write!(f, "Checkmate! {winner} wins."),
            Status::Draw => f.write_str("Draw."),
            Status::NewGame => f.write_str("New Game Started"),
        }
    }
}

pub struct Session {
    game: Game,
    search: Search,
    config: EngineConfig,
    just_reset: bool,
}

impl Session {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::from_game(Game::new(), config)
    }

    /// Starts the session from an existing game, e.g. one restored from FEN.
    pub fn from_game(game: Game, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Session {
            game,
            search: Search::from_config(&config),
            config,
            just_reset: false,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.game.is_game_over() && self.game.turn() == self.config.computer_color
    }

    /// Plays the human's move given in coordinate notation.
    pub fn human_move(&mut self, input: &str) -> EngineResult<Move> {
        if self.game.is_game_over() {
            return Err(EngineError::GameOver);
        }
        if self.game.turn() != self.config.human_color() {
            return Err(EngineError::NotHumanTurn);
        }

        let mov = self.game.parse_uci(input)?;
        let san = self.game.to_san(&mov);
        self.game.play(&mov)?;
        self.just_reset = false;
        debug!(%san, "human move");
        Ok(mov)
    }

    /// Lets the computer choose and play its move.
    ///
    /// # Returns
    ///
    /// * The move played, or `None` if the computer had no legal move
    pub fn computer_move(&mut self) -> EngineResult<Option<Move>> {
        if self.game.is_game_over() {
            return Err(EngineError::GameOver);
        }
        if self.game.turn() != self.config.computer_color {
            return Err(EngineError::NotComputerTurn);
        }

        let chosen = self.search.select_move(&self.game, self.config.depth)?;
        if let Some(mov) = &chosen {
            let san = self.game.to_san(mov);
            self.game.play(mov)?;
            self.just_reset = false;
            info!(%san, "computer move");
        }
        Ok(chosen)
    }

    pub fn reset(&mut self) {
        self.game = Game::new();
        self.just_reset = true;
        info!("new game");
    }

    pub fn status(&self) -> Status {
        match self.game.outcome() {
            Outcome::Checkmate { winner } => Status::Checkmate { winner },
            Outcome::Stalemate | Outcome::Draw(_) => Status::Draw,
            Outcome::Ongoing if self.just_reset => Status::NewGame,
            Outcome::Ongoing if self.game.turn() == self.config.computer_color => Status::ComputerToMove,
            Outcome::Ongoing => Status::HumanToMove,
        }
    }
}
