//! Morale and pawn defection.
//!
//! Morale is derived from material loss each time it is consulted; nothing here is stored
//! between consultations. Pawns of a demoralized side that stand next to an enemy piece may
//! change color.

use crate::board::{Board, ByColor, Color, PieceKind, Square};
use crate::rules::attacks::ADJACENT;
use crate::search::eval::material_loss;
use log::info;
use rand::Rng;

pub const MAX_MORALE: f32 = 10.0;
/// Morale at or below which pawns start to defect.
pub const SHAKEN: f32 = 3.0;
/// Morale at or below which defection becomes likely.
pub const BROKEN: f32 = 1.0;

pub fn morale_from_loss(loss: i32) -> f32 {
    (MAX_MORALE - loss as f32 / 3.0).clamp(0.0, MAX_MORALE)
}

pub fn morale(board: &Board) -> ByColor<f32> {
    let loss = material_loss(board);
    ByColor::new(morale_from_loss(loss.white), morale_from_loss(loss.black))
}

/// Per-pawn defection chance for a morale value, drawing its jitter from `rng`.
pub fn defection_chance<R: Rng + ?Sized>(morale: f32, rng: &mut R) -> f32 {
    if morale <= BROKEN {
        0.20 + rng.gen::<f32>() * 0.10
    } else if morale <= SHAKEN {
        0.05 + rng.gen::<f32>() * 0.10
    } else {
        0.0
    }
}

fn enemy_adjacent(board: &Board, sq: Square, color: Color) -> bool {
    ADJACENT
        .iter()
        .filter_map(|&(dr, dc)| sq.offset(dr, dc))
        .any(|s| matches!(board.get(s), Some(p) if p.color != color))
}

/// Runs one consultation: recomputes morale and flips defecting pawns in place.
/// Returns the morale used and the squares whose pawn changed sides.
pub fn consult<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> (ByColor<f32>, Vec<Square>) {
    let m = morale(board);
    let pawns: Vec<(Square, Color)> = board
        .pieces()
        .filter(|(_, p)| p.kind == PieceKind::Pawn)
        .map(|(sq, p)| (sq, p.color))
        .collect();
    let mut defected = Vec::new();
    for (sq, color) in pawns {
        if m[color] > SHAKEN { continue; }
        let chance = defection_chance(m[color], rng);
        if !enemy_adjacent(board, sq, color) { continue; }
        if rng.gen::<f32>() < chance {
            if let Some(p) = board.get(sq) {
                board.set(sq, Some(p.flipped()));
                info!("{color} pawn on {sq} defected");
                defected.push(sq);
            }
        }
    }
    (m, defected)
}
