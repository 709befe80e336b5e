use crate::board::{Board, Color, PieceKind, Square};
use crate::rules::attacks::{in_check, square_attacked};
use crate::rules::movegen::{moves_from, simulate, Move};
use crate::rules::state::GameState;
use crate::search::eval::value_of;
use crate::search::noise::{perturb, TIE_BREAK_NOISE};
use crate::search::safety::{exposure_penalty, global_threat_score};
use rand::Rng;

/// Heuristic weights of the single-ply selector.
#[derive(Debug, Clone, Copy)]
pub struct SelectorParams {
    pub danger_weight: f32,
    pub capture_weight: f32,
    pub safe_capture_bonus: f32,
    pub check_bonus: f32,
    pub center_bonus: f32,
    pub pawn_push_bonus: f32,
    pub idle_king_penalty: f32,
    pub noise: f32,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            danger_weight: 2.0,
            capture_weight: 1.5,
            safe_capture_bonus: 2.0,
            check_bonus: 3.0,
            center_bonus: 0.5,
            pawn_push_bonus: 1.0,
            idle_king_penalty: 1.0,
            noise: TIE_BREAK_NOISE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f32,
}

/// Moves the selector may choose for `color`: no fuse, merge or diplomacy, no castling, and
/// nothing that leaves its own leader in check.
pub fn candidate_moves(board: &Board, state: &GameState, color: Color) -> Vec<Move> {
    let leader = state.leader_kind(color);
    board
        .pieces_of(color)
        .flat_map(|(sq, _)| moves_from(board, state, sq, false))
        .filter(|m| !m.is_special_only())
        .filter(|m| !in_check(&simulate(board, m), color, leader))
        .collect()
}

#[inline]
fn is_center(sq: Square) -> bool {
    (3..=4).contains(&sq.row()) && (3..=4).contains(&sq.col())
}

/// Scores one candidate. `in_check_now` and `danger_now` describe the position before the move.
pub fn evaluate_move(
    board: &Board,
    state: &GameState,
    mv: &Move,
    color: Color,
    in_check_now: bool,
    danger_now: f32,
    params: &SelectorParams,
) -> f32 {
    let Some(piece) = board.get(mv.from) else { return f32::MIN };
    let opp = color.flip();
    let target = board.get(mv.to);
    let after = simulate(board, mv);
    let mut score = 0.0;

    let danger_after = global_threat_score(&after, color);
    score += (danger_now - danger_after) * params.danger_weight;

    if target.is_some() {
        score += value_of(target) * params.capture_weight;
        if !square_attacked(&after, mv.to, opp) {
            score += params.safe_capture_bonus;
        }
    }

    score -= exposure_penalty(&after, mv.to, color);

    if in_check(&after, opp, state.leader_kind(opp)) {
        score += params.check_bonus;
    }
    if is_center(mv.to) {
        score += params.center_bonus;
    }
    if piece.kind == PieceKind::Pawn && mv.from.row() == color.pawn_rank() {
        score += params.pawn_push_bonus;
    }
    if piece.kind.is_royal() && !in_check_now {
        score -= params.idle_king_penalty;
    }
    score
}

/// Picks the best-scoring candidate for `color`, breaking ties with uniform noise.
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    state: &GameState,
    color: Color,
    params: &SelectorParams,
    rng: &mut R,
) -> Option<ScoredMove> {
    let in_check_now = in_check(board, color, state.leader_kind(color));
    let danger_now = global_threat_score(board, color);
    let mut best: Option<ScoredMove> = None;
    for mv in candidate_moves(board, state, color) {
        let score = perturb(evaluate_move(board, state, &mv, color, in_check_now, danger_now, params), params.noise, rng);
        if best.map_or(true, |b| score > b.score) {
            best = Some(ScoredMove { mv, score });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sq(s: &str) -> Square { Square::from_algebraic(s).unwrap() }

    #[test]
    fn takes_a_free_queen() {
        let b = Board::from_placement("4k3/8/8/3q4/8/8/3R4/4K3").unwrap();
        let s = GameState::new();
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let best = select_move(&b, &s, Color::White, &SelectorParams::default(), &mut rng).unwrap();
            assert_eq!((best.mv.from, best.mv.to), (sq("d2"), sq("d5")), "seed {seed}");
        }
    }

    #[test]
    fn never_offers_special_candidates() {
        // Rook next to bishop and knights in merge/diplomacy range.
        let b = Board::from_placement("4k3/8/8/3n4/8/4N3/6N1/R1B1K3").unwrap();
        let moves = candidate_moves(&b, &GameState::new(), Color::White);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| !m.is_special_only() && !m.is_castle()));
    }
}
