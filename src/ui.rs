use std::io::{self, BufRead, Write};
use std::thread;

use tracing::warn;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::rules::Game;
use crate::session::{Session, Status};

/// Terminal front end: prints the board and reads coordinate moves.
pub struct ChessUI {
    session: Session,
}

impl ChessUI {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Ok(ChessUI {
            session: Session::new(config)?,
        })
    }

    pub fn from_game(game: Game, config: EngineConfig) -> EngineResult<Self> {
        Ok(ChessUI {
            session: Session::from_game(game, config)?,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the game loop until the input ends or the player quits.
    pub fn play_game<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "Welcome to casual chess! You play {}.", self.session.config().human_color())?;
        writeln!(out, "Enter moves in format: e2e4 (e7e8n to under-promote)")?;
        writeln!(out, "Commands: 'board', 'new', 'quit'\n")?;

        let mut lines = input.lines();
        self.show_board(&mut out)?;

        loop {
            if self.session.is_computer_turn() {
                self.computer_turn(&mut out)?;
                continue;
            }

            if self.session.game().is_game_over() {
                writeln!(out, "{}", self.session.status())?;
                writeln!(out, "Type 'new' to play again or 'quit' to exit.")?;
            } else {
                write!(out, "Your move: ")?;
            }
            out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };

            match line.trim().to_lowercase().as_str() {
                "" => continue,
                "quit" | "exit" => break,
                "board" | "display" => self.show_board(&mut out)?,
                "new" => {
                    self.session.reset();
                    writeln!(out, "{}", self.session.status())?;
                    self.show_board(&mut out)?;
                }
                text => match self.session.human_move(text) {
                    Ok(_) => self.show_board(&mut out)?,
                    Err(e) => writeln!(out, "{}", e)?,
                },
            }
        }

        Ok(())
    }

    fn computer_turn<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", Status::ComputerToMove)?;
        out.flush()?;
        thread::sleep(self.session.config().think_delay);

        let before = self.session.game().clone();
        match self.session.computer_move() {
            Ok(Some(mov)) => {
                writeln!(out, "Computer plays: {}", before.to_san(&mov))?;
                self.show_board(out)?;
            }
            Ok(None) => writeln!(out, "Computer has no move.")?,
            Err(EngineError::GameOver) => {}
            Err(e) => {
                warn!(error = %e, "computer could not move");
                writeln!(out, "{}", e)?;
            }
        }
        Ok(())
    }

    fn show_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}\n", self.session.game().board())
    }
}
