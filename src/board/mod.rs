mod piece;
mod square;

pub use piece::{ByColor, Color, Piece, PieceKind};
pub use square::{is_on_board, Coord, Square};

use crate::error::ChimeraError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Back rank layout shared by the start position and last-stand resurrection.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 grid of optional pieces. `Copy`, so speculative positions are plain value copies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self { Self::startpos() }
}

impl Board {
    pub fn empty() -> Self {
        Self { cells: [None; 64] }
    }

    pub fn startpos() -> Self {
        let mut b = Self::empty();
        for color in Color::ALL {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                b.set(Square::new(color.back_rank(), col as u8), Some(Piece::new(color, *kind)));
                b.set(Square::new(color.pawn_rank(), col as u8), Some(Piece::new(color, PieceKind::Pawn)));
            }
        }
        b
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index()] = piece;
    }

    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn find(&self, piece: Piece) -> Option<Square> {
        self.pieces().find(|(_, p)| *p == piece).map(|(sq, _)| sq)
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.pieces().filter(|(_, p)| *p == piece).count()
    }

    /// Parses a FEN-style placement: rows from row 0 (black's back rank) down, `/`-separated.
    pub fn from_placement(s: &str) -> Result<Self, ChimeraError> {
        let rows: Vec<&str> = s.trim().split('/').collect();
        if rows.len() != 8 {
            return Err(ChimeraError::InvalidPlacement(format!("expected 8 rows, got {}", rows.len())));
        }
        let mut b = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            let mut c = 0u8;
            for ch in row.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if c as u32 + d > 8 {
                        return Err(ChimeraError::InvalidPlacement(format!("row {r} overflows")));
                    }
                    c += d as u8;
                    continue;
                }
                let piece = Piece::from_symbol(ch)
                    .ok_or_else(|| ChimeraError::InvalidPlacement(format!("unknown piece '{ch}' in row {r}")))?;
                if c >= 8 {
                    return Err(ChimeraError::InvalidPlacement(format!("row {r} overflows")));
                }
                b.set(Square::new(r as u8, c), Some(piece));
                c += 1;
            }
            if c != 8 {
                return Err(ChimeraError::InvalidPlacement(format!("row {r} has {c} files")));
            }
        }
        Ok(b)
    }

    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for r in 0..8u8 {
            if r > 0 { out.push('/'); }
            let mut run = 0;
            for c in 0..8u8 {
                match self.get(Square::new(r, c)) {
                    Some(p) => {
                        if run > 0 { out.push(char::from(b'0' + run)); run = 0; }
                        out.push(p.symbol());
                    }
                    None => run += 1,
                }
            }
            if run > 0 { out.push(char::from(b'0' + run)); }
        }
        out
    }
}

impl From<Board> for String {
    fn from(b: Board) -> Self { b.placement() }
}

impl TryFrom<String> for Board {
    type Error = ChimeraError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Board::from_placement(&s) }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..8u8 {
            write!(f, "{} ", 8 - r)?;
            for c in 0..8u8 {
                let ch = self.get(Square::new(r, c)).map(|p| p.symbol()).unwrap_or('.');
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.placement())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_placement_roundtrips() {
        let b = Board::startpos();
        assert_eq!(b.placement(), START_PLACEMENT);
        assert_eq!(Board::from_placement(START_PLACEMENT).unwrap(), b);
        assert_eq!(b.get(Square::new(7, 4)), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(b.get(Square::new(1, 0)), Some(Piece::new(Color::Black, PieceKind::Pawn)));
    }

    #[test]
    fn rejects_malformed_placements() {
        assert!(Board::from_placement("8/8/8").is_err());
        assert!(Board::from_placement("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_placement("7y/8/8/8/8/8/8/8").is_err());
        // Long digit runs must not wrap the file counter back onto 8.
        let wrapped = format!("{}3/8/8/8/8/8/8/8", "9".repeat(29));
        assert!(Board::from_placement(&wrapped).is_err());
        assert!(Board::from_placement("44/8/8/8/8/8/8/8").is_ok());
    }

    #[test]
    fn copies_are_independent() {
        let b = Board::startpos();
        let mut c = b;
        c.take(Square::new(6, 4));
        assert!(b.get(Square::new(6, 4)).is_some());
        assert!(c.is_empty(Square::new(6, 4)));
    }
}
