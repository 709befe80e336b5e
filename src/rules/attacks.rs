use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::rules::state::LeaderKind;

pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ADJACENT: [(i8, i8); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const SHORT_JUMPS: [(i8, i8); 8] = [(2, 1), (2, -1), (-2, 1), (-2, -1), (1, 2), (1, -2), (-1, 2), (-1, -2)];
pub const LONG_JUMPS: [(i8, i8); 8] = [(4, 1), (4, -1), (-4, 1), (-4, -1), (1, 4), (1, -4), (-1, 4), (-1, -4)];

/// Square of the piece acting as `color`'s king, if any.
pub fn leader_square(board: &Board, color: Color, leader: LeaderKind) -> Option<Square> {
    let kind = leader.piece_kind();
    board.pieces_of(color).find(|(_, p)| p.kind == kind).map(|(sq, _)| sq)
}

/// True if `color`'s resolved leader is attacked. A color with no leader on the board is
/// always in check.
pub fn in_check(board: &Board, color: Color, leader: LeaderKind) -> bool {
    match leader_square(board, color, leader) {
        Some(sq) => square_attacked(board, sq, color.flip()),
        None => true,
    }
}

/// True if any piece of `by` attacks `sq`. The occupant of `sq` itself is ignored.
pub fn square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    // Pawns of `by` sit one row behind the target in their own forward direction.
    let behind = -by.forward();
    for dc in [-1, 1] {
        if let Some(from) = sq.offset(behind, dc) {
            if matches!(board.get(from), Some(p) if p.color == by && p.kind == PieceKind::Pawn) {
                return true;
            }
        }
    }

    for (dr, dc) in SHORT_JUMPS {
        if let Some(p) = sq.offset(dr, dc).and_then(|s| board.get(s)) {
            if p.color == by && matches!(p.kind, PieceKind::Knight | PieceKind::Chimera) {
                return true;
            }
        }
    }
    for (dr, dc) in LONG_JUMPS {
        if let Some(p) = sq.offset(dr, dc).and_then(|s| board.get(s)) {
            if p.color == by && matches!(p.kind, PieceKind::Legion | PieceKind::Chimera) {
                return true;
            }
        }
    }

    for (dr, dc) in ORTHOGONAL {
        if let Some((_, p)) = first_on_ray(board, sq, dr, dc) {
            if p.color == by
                && matches!(
                    p.kind,
                    PieceKind::Rook | PieceKind::Queen | PieceKind::Leader | PieceKind::ArchonLight | PieceKind::ArchonDark
                )
            {
                return true;
            }
        }
    }
    for (dr, dc) in DIAGONAL {
        if let Some((at, p)) = first_on_ray(board, sq, dr, dc) {
            if p.color != by { continue; }
            match p.kind {
                PieceKind::Bishop | PieceKind::Queen | PieceKind::Leader => return true,
                k if k.archon_diagonals_on(at.is_light()) => return true,
                _ => {}
            }
        }
    }

    for (dr, dc) in ADJACENT {
        if let Some(p) = sq.offset(dr, dc).and_then(|s| board.get(s)) {
            if p.color == by && p.kind == PieceKind::King {
                return true;
            }
        }
    }
    false
}

/// Same geometry as [`square_attacked`], read as "a friendly piece of `by` covers `sq`".
#[inline]
pub fn square_defended(board: &Board, sq: Square, by: Color) -> bool {
    square_attacked(board, sq, by)
}

fn first_on_ray(board: &Board, from: Square, dr: i8, dc: i8) -> Option<(Square, Piece)> {
    let mut cur = from.offset(dr, dc);
    while let Some(s) = cur {
        if let Some(p) = board.get(s) {
            return Some((s, p));
        }
        cur = s.offset(dr, dc);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square { Square::from_algebraic(s).unwrap() }

    #[test]
    fn startpos_has_no_checks() {
        let b = Board::startpos();
        assert!(!in_check(&b, Color::White, LeaderKind::King));
        assert!(!in_check(&b, Color::Black, LeaderKind::King));
        // e3 covered by white pawns d2/f2, e6 by black pawns.
        assert!(square_attacked(&b, sq("e3"), Color::White));
        assert!(square_attacked(&b, sq("e6"), Color::Black));
        assert!(!square_attacked(&b, sq("e4"), Color::White));
    }

    #[test]
    fn missing_leader_counts_as_check() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/8").unwrap();
        assert!(in_check(&b, Color::White, LeaderKind::King));
        assert!(!in_check(&b, Color::Black, LeaderKind::King));
    }

    #[test]
    fn leader_kind_is_resolved_not_literal() {
        // White Z-leader on e1 attacked by a black rook; a stray white king elsewhere is ignored.
        let b = Board::from_placement("k3r3/8/8/8/8/8/8/K3Z3").unwrap();
        assert!(in_check(&b, Color::White, LeaderKind::ZLeader));
        assert!(!in_check(&b, Color::White, LeaderKind::King));
    }

    #[test]
    fn legion_and_chimera_long_jumps_attack() {
        let b = Board::from_placement("4k3/8/8/8/3h4/8/8/8").unwrap();
        // Legion on d4 attacks e8 (4 up, 1 right).
        assert!(square_attacked(&b, sq("e8"), Color::Black));
        assert!(!square_attacked(&b, sq("e6"), Color::Black));
        let c = Board::from_placement("4k3/8/8/8/3x4/8/8/8").unwrap();
        assert!(square_attacked(&c, sq("e6"), Color::Black));
        assert!(square_attacked(&c, sq("e8"), Color::Black));
    }

    #[test]
    fn archon_diagonals_depend_on_its_square() {
        // d4 (row 4, col 3) is dark.
        let dark = Board::from_placement("8/8/8/8/3C4/8/8/8").unwrap();
        assert!(square_attacked(&dark, sq("f6"), Color::White));
        assert!(square_attacked(&dark, sq("d8"), Color::White));
        let light = Board::from_placement("8/8/8/8/3A4/8/8/8").unwrap();
        assert!(!square_attacked(&light, sq("f6"), Color::White));
        assert!(square_attacked(&light, sq("h4"), Color::White));
    }
}
