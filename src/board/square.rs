use crate::error::ChimeraError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board square as a numeric index `row * 8 + col`. Row 0 is black's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Coord", try_from = "Coord")]
pub struct Square(u8);

/// Wire form of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "square out of range: ({row}, {col})");
        Square(row * 8 + col)
    }

    /// Checked constructor for signed coordinates produced by offsets.
    #[inline]
    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if is_on_board(row, col) { Some(Square((row as u8) * 8 + col as u8)) } else { None }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        if idx < 64 { Some(Square(idx as u8)) } else { None }
    }

    #[inline]
    pub fn row(self) -> u8 { self.0 / 8 }

    #[inline]
    pub fn col(self) -> u8 { self.0 % 8 }

    #[inline]
    pub fn index(self) -> usize { self.0 as usize }

    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::try_new(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// (row + col) even is a light square.
    #[inline]
    pub fn is_light(self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }

    /// Parses `e4`-style names; rank 1 is row 7.
    pub fn from_algebraic(s: &str) -> Result<Self, ChimeraError> {
        let b = s.as_bytes();
        if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
            return Err(ChimeraError::InvalidSquare(s.to_string()));
        }
        let col = b[0] - b'a';
        let rank = b[1] - b'1';
        Ok(Square::new(7 - rank, col))
    }
}

#[inline]
pub fn is_on_board(row: i8, col: i8) -> bool {
    (0..8).contains(&row) && (0..8).contains(&col)
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col()) as char;
        let rank = 8 - self.row();
        write!(f, "{file}{rank}")
    }
}

impl From<Square> for Coord {
    fn from(sq: Square) -> Self {
        Coord { row: sq.row(), col: sq.col() }
    }
}

impl TryFrom<Coord> for Square {
    type Error = ChimeraError;
    fn try_from(c: Coord) -> Result<Self, Self::Error> {
        if c.row < 8 && c.col < 8 {
            Ok(Square::new(c.row, c.col))
        } else {
            Err(ChimeraError::InvalidSquare(format!("({}, {})", c.row, c.col)))
        }
    }
}
