use crate::board::{Board, ByColor, Color, Piece, PieceKind};

/// Piece values used by the move selector. The king's 100 only matters for threat scans
/// that skip it.
pub fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 3.0,
        PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Legion => 5.0,
        PieceKind::ArchonLight | PieceKind::ArchonDark => 7.0,
        PieceKind::Queen => 9.0,
        PieceKind::Chimera => 7.0,
        PieceKind::Leader => 10.0,
        PieceKind::King => 100.0,
    }
}

#[inline]
pub fn value_of(piece: Option<Piece>) -> f32 {
    piece.map(|p| piece_value(p.kind)).unwrap_or(0.0)
}

/// Values for the material-loss counters. Differs from [`piece_value`] on purpose (legion 6,
/// archon 8, queen 10); chimeras and royals are not counted.
pub fn loss_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::ArchonLight | PieceKind::ArchonDark => 8,
        PieceKind::Legion => 6,
        PieceKind::Queen => 10,
        PieceKind::Chimera | PieceKind::King | PieceKind::Leader => 0,
    }
}

/// Loss-table material of a full starting army: 8 pawns, 2 knights, 2 bishops, 2 rooks, queen.
pub const START_MATERIAL: i32 = 8 + 2 * 3 + 2 * 3 + 2 * 5 + 10;

pub fn material(board: &Board, color: Color) -> i32 {
    board.pieces_of(color).map(|(_, p)| loss_value(p.kind)).sum()
}

/// Material lost per color relative to the starting army. Promotions can make it negative.
pub fn material_loss(board: &Board) -> ByColor<i32> {
    ByColor::new(START_MATERIAL - material(board, Color::White), START_MATERIAL - material(board, Color::Black))
}
