use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step. White starts at the bottom (row 7).
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    #[inline]
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    #[inline]
    pub fn promotion_rank(self) -> u8 {
        self.flip().back_rank()
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A pair of values indexed by color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByColor<T> {
    pub white: T,
    pub black: T,
}

impl<T> ByColor<T> {
    pub fn new(white: T, black: T) -> Self {
        Self { white, black }
    }
}

impl<T: Clone> ByColor<T> {
    pub fn splat(v: T) -> Self {
        Self { white: v.clone(), black: v }
    }
}

impl<T> Index<Color> for ByColor<T> {
    type Output = T;
    fn index(&self, c: Color) -> &T {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

impl<T> IndexMut<Color> for ByColor<T> {
    fn index_mut(&mut self, c: Color) -> &mut T {
        match c {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Two merged knights; long jumps only.
    Legion,
    /// Rook+bishop fusion bound to light squares.
    ArchonLight,
    /// Rook+bishop fusion bound to dark squares.
    ArchonDark,
    /// Diplomacy-born knight with short and long jumps and unstable loyalty.
    Chimera,
    /// King substitute of a color in last-stand mode.
    Leader,
}

impl PieceKind {
    pub fn symbol(self) -> char {
        use PieceKind::*;
        match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
            Legion => 'h',
            ArchonLight => 'a',
            ArchonDark => 'c',
            Chimera => 'x',
            Leader => 'z',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        use PieceKind::*;
        Some(match ch.to_ascii_lowercase() {
            'p' => Pawn,
            'n' => Knight,
            'b' => Bishop,
            'r' => Rook,
            'q' => Queen,
            'k' => King,
            'h' => Legion,
            'a' => ArchonLight,
            'c' => ArchonDark,
            'x' => Chimera,
            'z' => Leader,
            _ => return None,
        })
    }

    /// Archon kind whose diagonal binding matches a square's shade.
    #[inline]
    pub fn archon_for(light: bool) -> Self {
        if light { PieceKind::ArchonLight } else { PieceKind::ArchonDark }
    }

    #[inline]
    pub fn is_archon(self) -> bool {
        matches!(self, PieceKind::ArchonLight | PieceKind::ArchonDark)
    }

    /// True when an archon of this kind may slide diagonally from a square of the given shade.
    #[inline]
    pub fn archon_diagonals_on(self, light: bool) -> bool {
        match self {
            PieceKind::ArchonLight => light,
            PieceKind::ArchonDark => !light,
            _ => false,
        }
    }

    /// King or Z-leader: never captured, located by the check oracle.
    #[inline]
    pub fn is_royal(self) -> bool {
        matches!(self, PieceKind::King | PieceKind::Leader)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Placement symbol: uppercase for white, lowercase for black.
    pub fn symbol(self) -> char {
        let s = self.kind.symbol();
        match self.color {
            Color::White => s.to_ascii_uppercase(),
            Color::Black => s,
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        let kind = PieceKind::from_symbol(ch)?;
        let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { color, kind })
    }

    #[inline]
    pub fn flipped(self) -> Self {
        Self { color: self.color.flip(), kind: self.kind }
    }
}
