use crate::board::{Board, Color, Square};
use crate::rules::attacks::{square_attacked, square_defended};
use crate::search::eval::piece_value;

/// Sum of the values of `color`'s pieces currently attacked by the opponent. Royals are
/// skipped: an attacked leader is check, which the legality filter already handles.
pub fn global_threat_score(board: &Board, color: Color) -> f32 {
    let opp = color.flip();
    board
        .pieces_of(color)
        .filter(|(_, p)| !p.kind.is_royal())
        .filter(|(sq, _)| square_attacked(board, *sq, opp))
        .map(|(_, p)| piece_value(p.kind))
        .sum()
}

/// Penalty for leaving the piece on `sq` en prise: full value x2 when undefended, x0.5 when a
/// friendly piece covers it, zero when the square is not attacked.
pub fn exposure_penalty(board: &Board, sq: Square, color: Color) -> f32 {
    let Some(p) = board.get(sq) else { return 0.0 };
    if !square_attacked(board, sq, color.flip()) {
        return 0.0;
    }
    let value = piece_value(p.kind);
    if square_defended(board, sq, color) { value * 0.5 } else { value * 2.0 }
}
