use crate::rules::{Board, Color, Game, PieceType};

/// Evaluated advantage. Positive favours White, negative favours Black.
pub type Score = i32;

// Material values (1 pawn = 10)
const PAWN_VALUE: Score = 10;
const KNIGHT_VALUE: Score = 30;
const BISHOP_VALUE: Score = 30;
const ROOK_VALUE: Score = 50;
const QUEEN_VALUE: Score = 90;
// Mate is detected by the rules engine, not by this number. It only keeps
// the king from ever looking cheap to the search.
const KING_VALUE: Score = 900;

// Bonus for any piece, of either color, standing on d4, e4, d5 or e5
const CENTER_BONUS: Score = 2;
const CENTER: std::ops::RangeInclusive<usize> = 3..=4;

pub fn piece_value(piece_type: PieceType) -> Score {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}

fn position_bonus(row: usize, col: usize) -> Score {
    if CENTER.contains(&row) && CENTER.contains(&col) {
        CENTER_BONUS
    } else {
        0
    }
}

/// Evaluates a board from White's perspective.
///
/// Each piece is worth its material value plus the center bonus; White's
/// pieces count positive and Black's negative. The function is pure, so the
/// same board always gets the same score, and an empty board scores 0.
pub fn evaluate(board: &Board) -> Score {
    board
        .pieces()
        .map(|(row, col, piece)| {
            let value = piece_value(piece.piece_type) + position_bonus(row, col);
            match piece.color {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum()
}

/// Evaluates the current board of a game.
pub fn evaluate_game(game: &Game) -> Score {
    evaluate(&game.board())
}
