//! Rules-engine seam.
//!
//! All chess rules come from `shakmaty`. This module adds what the search
//! needs on top of it: an undoable [`Game`], a scoped [`Played`] guard that
//! always takes its move back, the 8x8 [`Board`] view the evaluator reads,
//! and outcome classification including the draw rules.

use std::fmt;
use std::ops::{Deref, DerefMut};

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::Uci;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Position, Rank, Role, Square};

pub use shakmaty::{Move, MoveList};

use crate::error::{EngineError, EngineResult};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Side of the board. White is the light side, Black the dark side.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black. Multiplying a White-relative score by
    /// this gives the score from this side's point of view.
    pub fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl From<Role> for PieceType {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => PieceType::Pawn,
            Role::Knight => PieceType::Knight,
            Role::Bishop => PieceType::Bishop,
            Role::Rook => PieceType::Rook,
            Role::Queen => PieceType::Queen,
            Role::King => PieceType::King,
        }
    }
}

/// A piece is nothing more than its type and color; two pieces with the
/// same fields are the same piece.
#[derive(Debug, PartialEq, Copy, Clone, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece { piece_type, color }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = match self.piece_type {
            PieceType::Pawn => 'p',
            PieceType::Rook => 'r',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };

        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl From<shakmaty::Piece> for Piece {
    fn from(piece: shakmaty::Piece) -> Self {
        Piece {
            piece_type: piece.role.into(),
            color: piece.color.into(),
        }
    }
}

/// Read-only 8x8 view of a position.
///
/// Rows follow FEN reading order: row 0 is rank 8, row 7 is rank 1.
/// Column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Returns the contents of a square.
    ///
    /// # Panics
    ///
    /// * If `row` or `col` is outside 0..8
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.squares[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, piece: Option<Piece>) {
        self.squares[row][col] = piece;
    }

    /// Iterates over occupied squares as `(row, col, piece)`.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|piece| (row, col, piece)))
        })
    }

    fn from_shakmaty(board: &shakmaty::Board) -> Board {
        let mut view = Board::empty();
        for row in 0..8 {
            for col in 0..8 {
                let square = Square::from_coords(File::new(col as u32), Rank::new(7 - row as u32));
                view.squares[row][col] = board.piece_at(square).map(Piece::from);
            }
        }
        view
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.squares.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                match cell {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => f.write_str(". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

/// State of the game from the rules engine's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// A chess game with undo.
///
/// Every `play` stores the previous `Chess` value, and `undo` puts it back,
/// so apply-then-undo restores exactly the position that was there before.
/// The game also remembers one repetition key per position reached, which
/// is what the threefold-repetition rule is checked against.
#[derive(Debug, Clone)]
pub struct Game {
    position: Chess,
    undo_stack: Vec<Chess>,
    seen: Vec<Zobrist64>,
}

impl Game {
    /// Creates a game at the standard starting position.
    pub fn new() -> Game {
        Game::from_position(Chess::default())
    }

    /// Creates a game from a FEN string.
    ///
    /// # Arguments
    ///
    /// * `fen` - Forsyth-Edwards Notation of the position
    ///
    /// # Returns
    ///
    /// * The game, or an error if the text does not parse or the position
    ///   is not legal
    pub fn from_fen(fen: &str) -> EngineResult<Game> {
        let fen: Fen = fen.trim().parse()?;
        let position: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| EngineError::InvalidPosition {
                message: e.to_string(),
            })?;
        Ok(Game::from_position(position))
    }

    pub fn from_position(position: Chess) -> Game {
        let seen = vec![repetition_key(&position)];
        Game {
            position,
            undo_stack: Vec::new(),
            seen,
        }
    }

    /// FEN snapshot of the current position.
    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn turn(&self) -> Color {
        self.position.turn().into()
    }

    pub fn board(&self) -> Board {
        Board::from_shakmaty(self.position.board())
    }

    pub fn legal_moves(&self) -> MoveList {
        self.position.legal_moves()
    }

    /// Number of moves played since this game was created (and not undone).
    pub fn ply(&self) -> usize {
        self.undo_stack.len()
    }

    /// Applies a legal move.
    ///
    /// # Returns
    ///
    /// * `EngineError::IllegalMove` if the rules engine rejects the move;
    ///   the game is left untouched in that case
    pub fn play(&mut self, mv: &Move) -> EngineResult<()> {
        if !self.position.is_legal(mv) {
            return Err(EngineError::IllegalMove { mv: self.to_uci(mv) });
        }

        self.undo_stack.push(self.position.clone());
        self.position.play_unchecked(mv);
        self.seen.push(repetition_key(&self.position));
        Ok(())
    }

    /// Takes back the last move. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.position = previous;
                self.seen.pop();
                true
            }
            None => false,
        }
    }

    /// Applies a move for the lifetime of the returned guard.
    ///
    /// The game is rewound to the current ply when the guard is dropped,
    /// including during unwinding, so a branch explored through the guard
    /// can never leak into its siblings.
    pub fn play_scoped(&mut self, mv: &Move) -> EngineResult<Played<'_>> {
        let restore_ply = self.ply();
        self.play(mv)?;
        Ok(Played {
            game: self,
            restore_ply,
        })
    }

    fn rewind_to(&mut self, ply: usize) {
        while self.ply() > ply {
            self.undo();
        }
    }

    /// Draw by rule, if one applies. Stalemate is reported by `outcome`.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.position.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.position.halfmoves() >= 100 {
            Some(DrawReason::FiftyMoveRule)
        } else if self.repetitions() >= 3 {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.position.is_checkmate() {
            return Outcome::Checkmate {
                winner: self.turn().opposite(),
            };
        }
        if self.position.is_stalemate() {
            return Outcome::Stalemate;
        }
        match self.draw_reason() {
            Some(reason) => Outcome::Draw(reason),
            None => Outcome::Ongoing,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_over()
    }

    /// How many times the current position has occurred in this game.
    ///
    /// Only positions since the last capture or pawn move can repeat, so the
    /// scan stops after `halfmoves` plies.
    fn repetitions(&self) -> usize {
        let Some(current) = self.seen.last() else {
            return 0;
        };
        let window = self.position.halfmoves() as usize + 1;
        self.seen.iter().rev().take(window).filter(|key| *key == current).count()
    }

    /// Parses coordinate notation (`e2e4`, `e7e8q`, `e1g1`) against the
    /// current position. A promotion without a piece letter becomes a queen.
    pub fn parse_uci(&self, input: &str) -> EngineResult<Move> {
        let text = input.trim().to_ascii_lowercase();
        let uci: Uci = text
            .parse()
            .map_err(|_| EngineError::MoveSyntax { input: text.clone() })?;

        if let Ok(mv) = uci.to_move(&self.position) {
            return Ok(mv);
        }

        if let Uci::Normal {
            from,
            to,
            promotion: None,
        } = uci
        {
            let queening = Uci::Normal {
                from,
                to,
                promotion: Some(Role::Queen),
            };
            if let Ok(mv) = queening.to_move(&self.position) {
                return Ok(mv);
            }
        }

        Err(EngineError::IllegalMove { mv: text })
    }

    pub fn to_uci(&self, mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }

    /// Standard algebraic notation of a move legal in the current position.
    pub fn to_san(&self, mv: &Move) -> String {
        San::from_move(&self.position, mv).to_string()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

/// A move applied to a [`Game`] that is taken back on drop.
pub struct Played<'a> {
    game: &'a mut Game,
    restore_ply: usize,
}

impl Deref for Played<'_> {
    type Target = Game;

    fn deref(&self) -> &Game {
        &*self.game
    }
}

impl DerefMut for Played<'_> {
    fn deref_mut(&mut self) -> &mut Game {
        &mut *self.game
    }
}

impl Drop for Played<'_> {
    fn drop(&mut self) {
        self.game.rewind_to(self.restore_ply);
    }
}

// Placement, side to move, castling and en passant, but not the move clocks
fn repetition_key(position: &Chess) -> Zobrist64 {
    position.zobrist_hash(EnPassantMode::Legal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_round_trips_through_fen() {
        let game = Game::new();
        assert_eq!(game.fen(), START_FEN);
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn test_board_view_orientation() {
        let board = Game::new().board();

        assert_eq!(board.get(0, 0), Some(Piece::new(PieceType::Rook, Color::Black)));
        assert_eq!(board.get(0, 4), Some(Piece::new(PieceType::King, Color::Black)));
        assert_eq!(board.get(7, 3), Some(Piece::new(PieceType::Queen, Color::White)));
        assert_eq!(board.get(6, 4), Some(Piece::new(PieceType::Pawn, Color::White)));
        assert_eq!(board.get(4, 4), None);
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn test_undo_restores_exact_position() {
        let mut game = Game::from_fen("r3k2r/8/8/3pP3/8/8/8/R3K2R w KQkq d6 0 1").unwrap();
        let before = game.fen();

        for mv in game.legal_moves() {
            game.play(&mv).unwrap();
            assert!(game.undo());
            assert_eq!(game.fen(), before);
        }
        assert!(!game.undo());
    }

    #[test]
    fn test_scoped_play_rewinds_on_drop() {
        let mut game = Game::new();
        let before = game.fen();
        let e4 = game.parse_uci("e2e4").unwrap();

        {
            let mut played = game.play_scoped(&e4).unwrap();
            assert_eq!(played.turn(), Color::Black);
            let e5 = played.parse_uci("e7e5").unwrap();
            played.play(&e5).unwrap();
            assert_eq!(played.ply(), 2);
        }

        assert_eq!(game.ply(), 0);
        assert_eq!(game.fen(), before);
    }

    #[test]
    fn test_illegal_move_is_rejected_without_side_effects() {
        let mut game = Game::new();
        let e4 = game.parse_uci("e2e4").unwrap();
        game.play(&e4).unwrap();
        let after = game.fen();

        // e2e4 again is no longer legal: the pawn has left e2
        let result = game.play(&e4);
        assert!(matches!(result, Err(EngineError::IllegalMove { .. })));
        assert_eq!(game.fen(), after);
    }

    #[test]
    fn test_parse_uci_errors() {
        let game = Game::new();
        assert!(matches!(game.parse_uci("hello"), Err(EngineError::MoveSyntax { .. })));
        assert!(matches!(game.parse_uci("e2e5"), Err(EngineError::IllegalMove { .. })));
        assert!(game.parse_uci(" E2E4 ").is_ok());
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let game = Game::from_fen("8/4P3/8/8/8/8/8/k1K5 w - - 0 1").unwrap();

        let mv = game.parse_uci("e7e8").unwrap();
        assert_eq!(mv.promotion(), Some(Role::Queen));

        let mv = game.parse_uci("e7e8n").unwrap();
        assert_eq!(mv.promotion(), Some(Role::Knight));
    }

    #[test]
    fn test_castling_in_coordinate_notation() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castle = game.parse_uci("e1g1").unwrap();
        assert!(castle.is_castle());
        assert_eq!(game.to_san(&castle), "O-O");

        game.play(&castle).unwrap();
        let board = game.board();
        assert_eq!(board.get(7, 6), Some(Piece::new(PieceType::King, Color::White)));
        assert_eq!(board.get(7, 5), Some(Piece::new(PieceType::Rook, Color::White)));
    }

    #[test]
    fn test_checkmate_outcome() {
        let game = Game::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert_eq!(game.outcome(), Outcome::Checkmate { winner: Color::Black });
        assert!(game.is_game_over());
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_stalemate_outcome() {
        let game = Game::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert_eq!(game.outcome(), Outcome::Stalemate);
    }

    #[test]
    fn test_insufficient_material_is_a_draw() {
        let game = Game::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert_eq!(game.outcome(), Outcome::Draw(DrawReason::InsufficientMaterial));
        assert!(!game.legal_moves().is_empty());
    }

    #[test]
    fn test_fifty_move_rule() {
        let game = Game::from_fen("8/8/4k3/8/8/3K4/8/R7 w - - 100 80").unwrap();
        assert_eq!(game.outcome(), Outcome::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn test_threefold_repetition() {
        let mut game = Game::new();
        // Knights out and back twice brings the start position up a third time
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"] {
            let mv = game.parse_uci(uci).unwrap();
            game.play(&mv).unwrap();
            assert_eq!(game.outcome(), Outcome::Ongoing);
        }

        let mv = game.parse_uci("f6g8").unwrap();
        game.play(&mv).unwrap();
        assert_eq!(game.outcome(), Outcome::Draw(DrawReason::ThreefoldRepetition));

        game.undo();
        assert_eq!(game.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn test_repetition_key_ignores_move_clocks() {
        let early = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let late = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 37 60").unwrap();
        assert_eq!(repetition_key(early.position()), repetition_key(late.position()));

        let other_side = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b Q - 0 1").unwrap();
        assert_ne!(repetition_key(early.position()), repetition_key(other_side.position()));

        let no_castling = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_ne!(repetition_key(early.position()), repetition_key(no_castling.position()));
    }

    #[test]
    fn test_pawn_move_resets_repetition_history() {
        let mut game = Game::new();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "e2e4", "e7e5"] {
            let mv = game.parse_uci(uci).unwrap();
            game.play(&mv).unwrap();
        }
        // Same dance again after the pawn moves: two occurrences, not three
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let mv = game.parse_uci(uci).unwrap();
            game.play(&mv).unwrap();
        }
        assert_eq!(game.repetitions(), 2);
        assert_eq!(game.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(Game::from_fen("not a fen"), Err(EngineError::Fen(_))));
        // Both kings missing
        assert!(matches!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(EngineError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_board_display() {
        let text = Game::new().board().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r ");
        assert!(text.ends_with("  a b c d e f g h"));
    }
}
