//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Values inside the search are always from the point of view of the side
//! to move at the root: larger is better for the root side. Nodes where the
//! root side is to move maximize, the others minimize, and leaves convert
//! the White-relative evaluation with `root.sign()`.

use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::evaluation::{evaluate_game, Score};
use crate::moveorder::MoveOrderer;
use crate::rules::{Color, Game, Move, Played};

pub const MAX_SCORE: Score = 100_000;
pub const MIN_SCORE: Score = -100_000;

/// Counters for the most recent `select_move` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited below the root
    pub nodes: u64,
    /// Sibling lists abandoned because `beta <= alpha`
    pub cutoffs: u64,
    /// Value of the chosen move, `None` when there was no move
    pub best_value: Option<Score>,
    /// Wall-clock time spent in the call
    pub elapsed: Duration,
}

/// Move selection for the computer side.
///
/// A `Search` carries nothing from one call to the next except its random
/// number generator and the statistics of the last call, which the search
/// itself never reads.
#[derive(Clone, Debug)]
pub struct Search {
    move_orderer: MoveOrderer,
    stats: SearchStats,
}

impl Search {
    pub fn new() -> Self {
        Self::with_orderer(MoveOrderer::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_orderer(MoveOrderer::with_seed(seed))
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn with_orderer(move_orderer: MoveOrderer) -> Self {
        Self {
            move_orderer,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Find the best move for the side to move.
    ///
    /// `depth` counts plies including the move being chosen, so each root
    /// candidate is followed by `depth - 1` plies of minimax. The caller's
    /// game is not modified; the search runs on a private copy.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` when the side to move has no legal move
    /// * `Err(EngineError::InvalidDepth)` when `depth` is 0
    ///
    /// # Panics
    ///
    /// * If the rules engine refuses to play a move it generated itself
    pub fn select_move(&mut self, game: &Game, depth: u32) -> EngineResult<Option<Move>> {
        if depth == 0 {
            return Err(EngineError::InvalidDepth { depth });
        }

        let start_time = Instant::now();
        self.stats = SearchStats::default();

        let mut work = game.clone();
        let root = work.turn();
        let mut moves = work.legal_moves();
        if moves.is_empty() {
            debug!(fen = %work.fen(), "no legal moves at root");
            return Ok(None);
        }

        // Shuffle so that ties between equally valued moves fall randomly
        self.move_orderer.order_moves(&mut moves);

        let mut best_move = None;
        let mut best_score = MIN_SCORE;

        for mov in moves {
            let score = {
                let mut child = play_generated(&mut work, &mov);
                self.alpha_beta(&mut child, depth - 1, MIN_SCORE, MAX_SCORE, false, root)
            };
            debug!(mv = %work.to_uci(&mov), score, "root move searched");

            // Non-strict on purpose: among equal scores the shuffle decides
            if score >= best_score {
                best_score = score;
                best_move = Some(mov);
            }
        }

        self.stats.best_value = Some(best_score);
        self.stats.elapsed = start_time.elapsed();

        if let Some(mov) = &best_move {
            info!(
                mv = %work.to_uci(mov),
                score = best_score,
                depth,
                nodes = self.stats.nodes,
                cutoffs = self.stats.cutoffs,
                elapsed_ms = self.stats.elapsed.as_millis() as u64,
                "move selected"
            );
        }

        Ok(best_move)
    }

    fn alpha_beta(
        &mut self,
        game: &mut Game,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        root: Color,
    ) -> Score {
        self.stats.nodes += 1;

        if depth == 0 || game.draw_reason().is_some() {
            return leaf_score(game, root);
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            // Checkmate or stalemate
            return leaf_score(game, root);
        }

        if maximizing {
            let mut best = MIN_SCORE;
            for mov in &moves {
                let score = {
                    let mut child = play_generated(game, mov);
                    self.alpha_beta(&mut child, depth - 1, alpha, beta, false, root)
                };
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    trace!(depth, alpha, beta, "beta cutoff");
                    break;
                }
            }
            best
        } else {
            let mut best = MAX_SCORE;
            for mov in &moves {
                let score = {
                    let mut child = play_generated(game, mov);
                    self.alpha_beta(&mut child, depth - 1, alpha, beta, true, root)
                };
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    trace!(depth, alpha, beta, "alpha cutoff");
                    break;
                }
            }
            best
        }
    }
}

impl Default for Search {
    fn default() -> Self {
        Search::new()
    }
}

/// Selects a move with a freshly seeded [`Search`].
pub fn select_move(game: &Game, depth: u32) -> EngineResult<Option<Move>> {
    Search::new().select_move(game, depth)
}

fn leaf_score(game: &Game, root: Color) -> Score {
    evaluate_game(game) * root.sign()
}

fn play_generated<'a>(game: &'a mut Game, mov: &Move) -> Played<'a> {
    match game.play_scoped(mov) {
        Ok(played) => played,
        Err(e) => panic!("rules engine rejected a move it generated: {e}"),
    }
}
