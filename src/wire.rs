//! Relay message shapes. Every move message carries the full position, so a receiver simply
//! replaces its state instead of replaying deltas.

use crate::board::{Board, ByColor, Color, PieceKind, Square};
use crate::error::ChimeraError;
use crate::rules::{CastlingRights, ChimeraTracker, GameState, LeaderKind, Mode, Move};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub is_proposal: bool,
}

impl MoveRecord {
    pub fn played(mv: &Move) -> Self {
        Self { from: mv.from, to: mv.to, is_proposal: false }
    }

    pub fn proposal(from: Square, to: Square) -> Self {
        Self { from, to, is_proposal: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub board: Board,
    /// Side to move once this payload is applied.
    pub turn: Color,
    pub last_move: Option<MoveRecord>,
    pub castling: ByColor<CastlingRights>,
    pub mode: Mode,
    pub move_count: u32,
    #[serde(default)]
    pub chimera_tracker: ChimeraTracker,
    /// Which colors play with a Z-leader. Older peers only send `mode`.
    #[serde(default)]
    pub last_stand: ByColor<bool>,
}

impl MovePayload {
    pub fn snapshot(board: &Board, state: &GameState, tracker: &ChimeraTracker, last_move: Option<MoveRecord>) -> Self {
        Self {
            board: *board,
            turn: state.turn,
            last_move,
            castling: state.castling,
            mode: state.mode(),
            move_count: state.move_count,
            chimera_tracker: tracker.clone(),
            last_stand: ByColor::new(state.is_last_stand(Color::White), state.is_last_stand(Color::Black)),
        }
    }

    /// Writes the synced fields into `state`. The local loyalty countdown is kept.
    pub fn restore_state(&self, state: &mut GameState) {
        state.turn = self.turn;
        state.castling = self.castling;
        state.move_count = self.move_count;
        let mut flags = self.last_stand;
        // A peer that only reports the mode: the leader is whoever still has a Z on the board.
        if self.mode == Mode::LastStand && !flags.white && !flags.black {
            for c in Color::ALL {
                flags[c] = self.board.pieces_of(c).any(|(_, p)| p.kind == PieceKind::Leader);
            }
        }
        for c in Color::ALL {
            let leader = if flags[c] { LeaderKind::ZLeader } else { LeaderKind::King };
            state.leaders[c] = leader;
            state.revived[c] = state.revived[c] || flags[c];
        }
    }

    pub fn to_json(&self) -> Result<String, ChimeraError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, ChimeraError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Sent by the relay once both seats are filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStart {
    /// Seat assigned to the receiver.
    pub color: Color,
    pub board: Board,
    pub turn: Color,
    pub castling: ByColor<CastlingRights>,
}

impl GameStart {
    pub fn from_json(s: &str) -> Result<Self, ChimeraError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_record_uses_row_col_objects() {
        let rec = MoveRecord::proposal(Square::new(5, 2), Square::new(3, 3));
        let v: serde_json::Value = serde_json::to_value(rec).unwrap();
        assert_eq!(v["from"]["row"], 5);
        assert_eq!(v["to"]["col"], 3);
        assert_eq!(v["isProposal"], true);
    }

    #[test]
    fn mode_only_peers_resolve_the_leader_from_the_board() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/3Z4").unwrap();
        let mut payload = MovePayload::snapshot(&board, &GameState::new(), &ChimeraTracker::new(), None);
        payload.mode = Mode::LastStand;
        let mut state = GameState::new();
        payload.restore_state(&mut state);
        assert!(state.is_last_stand(Color::White));
        assert!(state.revived[Color::White]);
        assert!(!state.is_last_stand(Color::Black));
    }
}
