use crate::board::{ByColor, Color, PieceKind};
use serde::{Deserialize, Serialize};

/// Turns between morale consultations.
pub const LOYALTY_PERIOD: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Classic,
    LastStand,
}

/// Which piece acts as a color's king for check purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LeaderKind {
    #[default]
    King,
    ZLeader,
}

impl LeaderKind {
    #[inline]
    pub fn piece_kind(self) -> PieceKind {
        match self {
            LeaderKind::King => PieceKind::King,
            LeaderKind::ZLeader => PieceKind::Leader,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRights {
    pub king_moved: bool,
    pub rook_kingside_intact: bool,
    pub rook_queenside_intact: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self { king_moved: false, rook_kingside_intact: true, rook_queenside_intact: true }
    }
}

impl CastlingRights {
    pub fn can_castle_short(&self) -> bool { !self.king_moved && self.rook_kingside_intact }
    pub fn can_castle_long(&self) -> bool { !self.king_moved && self.rook_queenside_intact }

    /// Clears the right tied to a rook home file (0 or 7); other files are ignored.
    pub fn clear_rook_file(&mut self, col: u8) {
        match col {
            0 => self.rook_queenside_intact = false,
            7 => self.rook_kingside_intact = false,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub turn: Color,
    pub leaders: ByColor<LeaderKind>,
    /// Colors that have already used their one resurrection.
    pub revived: ByColor<bool>,
    pub castling: ByColor<CastlingRights>,
    pub move_count: u32,
    pub loyalty_countdown: u8,
}

impl Default for GameState {
    fn default() -> Self { Self::new() }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            turn: Color::White,
            leaders: ByColor::default(),
            revived: ByColor::default(),
            castling: ByColor::default(),
            move_count: 0,
            loyalty_countdown: LOYALTY_PERIOD,
        }
    }

    #[inline]
    pub fn leader_kind(&self, color: Color) -> LeaderKind {
        self.leaders[color]
    }

    #[inline]
    pub fn is_last_stand(&self, color: Color) -> bool {
        self.leaders[color] == LeaderKind::ZLeader
    }

    pub fn mode(&self) -> Mode {
        if Color::ALL.iter().any(|&c| self.is_last_stand(c)) { Mode::LastStand } else { Mode::Classic }
    }

    /// Color currently led by a Z-leader. If both are, the side to move is reported.
    pub fn leader_color(&self) -> Option<Color> {
        match (self.is_last_stand(Color::White), self.is_last_stand(Color::Black)) {
            (true, true) => Some(self.turn),
            (true, false) => Some(Color::White),
            (false, true) => Some(Color::Black),
            (false, false) => None,
        }
    }

    pub fn resurrection_allowed(&self, color: Color) -> bool {
        !self.revived[color]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_leaders() {
        let mut s = GameState::new();
        assert_eq!(s.mode(), Mode::Classic);
        assert_eq!(s.leader_color(), None);
        s.leaders[Color::Black] = LeaderKind::ZLeader;
        assert_eq!(s.mode(), Mode::LastStand);
        assert_eq!(s.leader_color(), Some(Color::Black));
        assert_eq!(s.leader_kind(Color::White), LeaderKind::King);
    }

    #[test]
    fn rook_file_clears_matching_side() {
        let mut r = CastlingRights::default();
        r.clear_rook_file(7);
        assert!(!r.can_castle_short());
        assert!(r.can_castle_long());
        r.king_moved = true;
        assert!(!r.can_castle_long());
    }
}
