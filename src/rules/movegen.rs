use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::rules::attacks::{self, ADJACENT, DIAGONAL, LONG_JUMPS, ORTHOGONAL, SHORT_JUMPS};
use crate::rules::state::GameState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Special {
    #[default]
    None,
    Fuse,
    Merge,
    CastleShort,
    CastleLong,
    Diplomacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub capture: bool,
    pub special: Special,
}

impl Move {
    pub fn new(from: Square, to: Square, capture: bool) -> Self {
        Self { from, to, capture, special: Special::None }
    }

    pub fn with_special(from: Square, to: Square, capture: bool, special: Special) -> Self {
        Self { from, to, capture, special }
    }

    /// Fuse, merge and diplomacy candidates never count as escapes from mate and are not
    /// considered by the AI.
    #[inline]
    pub fn is_special_only(&self) -> bool {
        matches!(self.special, Special::Fuse | Special::Merge | Special::Diplomacy)
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(self.special, Special::CastleShort | Special::CastleLong)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        match self.special {
            Special::Fuse => f.write_str(":fuse"),
            Special::Merge => f.write_str(":merge"),
            Special::Diplomacy => f.write_str(":dip"),
            _ => Ok(()),
        }
    }
}

/// Moves for the piece on `from`. With `safe`, castling is considered and moves leaving the
/// mover's leader in check are removed.
pub fn moves_from(board: &Board, state: &GameState, from: Square, safe: bool) -> Vec<Move> {
    let Some(piece) = board.get(from) else { return Vec::new() };
    let mut out = Vec::with_capacity(16);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.color, &mut out),
        PieceKind::Knight => knight_moves(board, from, piece.color, &mut out),
        PieceKind::Legion => jump_moves(board, from, piece.color, &LONG_JUMPS, &mut out),
        PieceKind::Chimera => {
            jump_moves(board, from, piece.color, &SHORT_JUMPS, &mut out);
            jump_moves(board, from, piece.color, &LONG_JUMPS, &mut out);
        }
        PieceKind::Rook => slide_moves(board, from, piece, &ORTHOGONAL, &mut out),
        PieceKind::Bishop => slide_moves(board, from, piece, &DIAGONAL, &mut out),
        PieceKind::Queen => {
            slide_moves(board, from, piece, &ORTHOGONAL, &mut out);
            slide_moves(board, from, piece, &DIAGONAL, &mut out);
        }
        PieceKind::ArchonLight | PieceKind::ArchonDark => {
            slide_moves(board, from, piece, &ORTHOGONAL, &mut out);
            if piece.kind.archon_diagonals_on(from.is_light()) {
                slide_moves(board, from, piece, &DIAGONAL, &mut out);
            }
        }
        PieceKind::King | PieceKind::Leader => {
            jump_moves(board, from, piece.color, &ADJACENT, &mut out);
            if safe && piece.kind == PieceKind::King {
                castle_moves(board, state, from, piece.color, &mut out);
            }
        }
    }

    // Kings and Z-leaders are never captured.
    out.retain(|m| !matches!(board.get(m.to), Some(t) if t.kind.is_royal()));

    if safe {
        let leader = state.leader_kind(piece.color);
        out.retain(|m| !attacks::in_check(&simulate(board, m), piece.color, leader));
    }
    out
}

/// All moves of `color` after the legality filter.
pub fn legal_moves(board: &Board, state: &GameState, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|(sq, _)| moves_from(board, state, sq, true))
        .collect()
}

/// True if `color` has a legal move other than a fuse, merge or diplomacy candidate.
pub fn has_saving_move(board: &Board, state: &GameState, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(sq, _)| moves_from(board, state, sq, true).iter().any(|m| !m.is_special_only()))
}

/// Board after relocating the moving piece; castling also relocates its rook. Used for
/// check tests and evaluation only, never for the live board.
pub fn simulate(board: &Board, mv: &Move) -> Board {
    let mut copy = *board;
    let piece = copy.take(mv.from);
    copy.set(mv.to, piece);
    let row = mv.from.row();
    match mv.special {
        Special::CastleShort => {
            let rook = copy.take(Square::new(row, 7));
            copy.set(Square::new(row, 5), rook);
        }
        Special::CastleLong => {
            let rook = copy.take(Square::new(row, 0));
            copy.set(Square::new(row, 3), rook);
        }
        _ => {}
    }
    copy
}

fn pawn_moves(board: &Board, from: Square, color: Color, out: &mut Vec<Move>) {
    let dir = color.forward();
    if let Some(one) = from.offset(dir, 0) {
        if board.is_empty(one) {
            out.push(Move::new(from, one, false));
            if from.row() == color.pawn_rank() {
                if let Some(two) = from.offset(2 * dir, 0) {
                    if board.is_empty(two) {
                        out.push(Move::new(from, two, false));
                    }
                }
            }
        }
    }
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            if matches!(board.get(to), Some(t) if t.color != color) {
                out.push(Move::new(from, to, true));
            }
        }
    }
}

fn knight_moves(board: &Board, from: Square, color: Color, out: &mut Vec<Move>) {
    for (dr, dc) in SHORT_JUMPS {
        let Some(to) = from.offset(dr, dc) else { continue };
        match board.get(to) {
            None => out.push(Move::new(from, to, false)),
            Some(t) if t.kind == PieceKind::Knight && t.color == color => {
                out.push(Move::with_special(from, to, false, Special::Merge));
            }
            Some(t) if t.kind == PieceKind::Knight => {
                out.push(Move::with_special(from, to, true, Special::Diplomacy));
            }
            Some(t) if t.color != color => out.push(Move::new(from, to, true)),
            Some(_) => {}
        }
    }
}

fn jump_moves(board: &Board, from: Square, color: Color, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(dr, dc) in deltas {
        let Some(to) = from.offset(dr, dc) else { continue };
        match board.get(to) {
            None => out.push(Move::new(from, to, false)),
            Some(t) if t.color != color => out.push(Move::new(from, to, true)),
            Some(_) => {}
        }
    }
}

fn slide_moves(board: &Board, from: Square, piece: Piece, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(dr, dc) in dirs {
        let mut cur = from.offset(dr, dc);
        while let Some(to) = cur {
            match board.get(to) {
                None => out.push(Move::new(from, to, false)),
                Some(t) if t.color != piece.color => {
                    out.push(Move::new(from, to, true));
                    break;
                }
                Some(t) => {
                    let complementary = matches!(
                        (piece.kind, t.kind),
                        (PieceKind::Rook, PieceKind::Bishop) | (PieceKind::Bishop, PieceKind::Rook)
                    );
                    if complementary {
                        out.push(Move::with_special(from, to, false, Special::Fuse));
                    }
                    break;
                }
            }
            cur = to.offset(dr, dc);
        }
    }
}

fn castle_moves(board: &Board, state: &GameState, from: Square, color: Color, out: &mut Vec<Move>) {
    let row = color.back_rank();
    if from != Square::new(row, 4) {
        return;
    }
    let rights = state.castling[color];
    if rights.king_moved {
        return;
    }
    let opp = color.flip();
    if attacks::in_check(board, color, state.leader_kind(color)) {
        return;
    }
    let rook = Piece::new(color, PieceKind::Rook);
    let empty = |cols: &[u8]| cols.iter().all(|&c| board.is_empty(Square::new(row, c)));
    let safe = |cols: &[u8]| cols.iter().all(|&c| !attacks::square_attacked(board, Square::new(row, c), opp));

    if rights.can_castle_short()
        && board.get(Square::new(row, 7)) == Some(rook)
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        out.push(Move::with_special(from, Square::new(row, 6), false, Special::CastleShort));
    }
    if rights.can_castle_long()
        && board.get(Square::new(row, 0)) == Some(rook)
        && empty(&[1, 2, 3])
        && safe(&[3, 2])
    {
        out.push(Move::with_special(from, Square::new(row, 2), false, Special::CastleLong));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square { Square::from_algebraic(s).unwrap() }

    fn targets(board: &Board, from: &str) -> Vec<String> {
        let mut v: Vec<String> = moves_from(board, &GameState::new(), sq(from), true)
            .iter()
            .map(|m| m.to_string())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let b = Board::startpos();
        assert_eq!(legal_moves(&b, &GameState::new(), Color::White).len(), 20);
        assert_eq!(targets(&b, "e2"), vec!["e2e3", "e2e4"]);
    }

    #[test]
    fn rook_sliding_into_bishop_offers_fusion() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/R1B1K3").unwrap();
        let moves = moves_from(&b, &GameState::new(), sq("a1"), true);
        let fuse: Vec<_> = moves.iter().filter(|m| m.special == Special::Fuse).collect();
        assert_eq!(fuse.len(), 1);
        assert_eq!(fuse[0].to, sq("c1"));
        // Queens and archons never fuse.
        let q = Board::from_placement("4k3/8/8/8/8/8/8/Q1B1K3").unwrap();
        assert!(moves_from(&q, &GameState::new(), sq("a1"), true).iter().all(|m| m.special != Special::Fuse));
    }

    #[test]
    fn knight_meets_knights() {
        let b = Board::from_placement("4k3/8/8/3n4/8/4N3/8/4K1N1").unwrap();
        let moves = moves_from(&b, &GameState::new(), sq("e3"), true);
        let to_d5 = moves.iter().find(|m| m.to == sq("d5")).unwrap();
        assert_eq!(to_d5.special, Special::Diplomacy);
        assert!(to_d5.capture);
        let to_g2: Vec<_> = moves.iter().filter(|m| m.to == sq("g2")).collect();
        assert!(to_g2.iter().all(|m| m.special == Special::None));
        let g1 = moves_from(&b, &GameState::new(), sq("g1"), true);
        let merges: Vec<_> = g1.iter().filter(|m| m.special == Special::Merge).collect();
        assert_eq!(merges.len(), 0);
        let e3_from_g2 = Board::from_placement("4k3/8/8/8/8/4N3/6N1/4K3").unwrap();
        let m = moves_from(&e3_from_g2, &GameState::new(), sq("g2"), true);
        assert!(m.iter().any(|m| m.to == sq("e3") && m.special == Special::Merge));
    }

    #[test]
    fn kings_are_never_capture_targets() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/4RK2").unwrap();
        // Rook on e1 gives check along the file but may not land on e8.
        assert!(targets(&b, "e1").iter().all(|m| m != "e1e8"));
    }
}
