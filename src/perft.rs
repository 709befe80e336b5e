// Move-generator node counter. Each child is a value copy of the parent position.
use crate::board::Board;
use crate::rules::mechanics::{apply_move, ChimeraTracker};
use crate::rules::movegen::legal_moves;
use crate::rules::state::GameState;

/// Counts leaf positions `depth` plies below `board` with `state.turn` to move. Fuse, merge
/// and diplomacy candidates are counted as moves; diplomacy is played as a capture.
pub fn perft(board: &Board, state: &GameState, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = legal_moves(board, state, state.turn);
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for m in moves {
        let mut child = *board;
        let mut st = state.clone();
        let mut tracker = ChimeraTracker::new();
        apply_move(&mut child, &mut st, &mut tracker, &m);
        st.turn = st.turn.flip();
        nodes += perft(&child, &st, depth - 1);
    }
    nodes
}

/// Per-root-move breakdown, for comparing against another generator.
pub fn divide(board: &Board, state: &GameState, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 { return Vec::new(); }
    legal_moves(board, state, state.turn)
        .into_iter()
        .map(|m| {
            let mut child = *board;
            let mut st = state.clone();
            apply_move(&mut child, &mut st, &mut ChimeraTracker::new(), &m);
            st.turn = st.turn.flip();
            (m.to_string(), perft(&child, &st, depth - 1))
        })
        .collect()
}
