use crate::board::{Board, Color, Piece, PieceKind, Square, BACK_RANK};
use crate::rules::movegen::{Move, Special};
use crate::rules::state::{GameState, LeaderKind};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owner turns a chimera stays loyal before changing sides.
pub const CHIMERA_FLIP_AT: u8 = 2;

/// Loyalty counters of living chimeras, keyed by square.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TrackerEntry>", into = "Vec<TrackerEntry>")]
pub struct ChimeraTracker {
    counters: BTreeMap<Square, u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
    pub square: Square,
    pub loyalty: u8,
}

/// Relayed counters are capped one short of a flip.
impl From<Vec<TrackerEntry>> for ChimeraTracker {
    fn from(v: Vec<TrackerEntry>) -> Self {
        Self { counters: v.into_iter().map(|e| (e.square, e.loyalty.min(CHIMERA_FLIP_AT - 1))).collect() }
    }
}

impl From<ChimeraTracker> for Vec<TrackerEntry> {
    fn from(t: ChimeraTracker) -> Self {
        t.counters.into_iter().map(|(square, loyalty)| TrackerEntry { square, loyalty }).collect()
    }
}

impl ChimeraTracker {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, sq: Square) -> Option<u8> { self.counters.get(&sq).copied() }

    pub fn len(&self) -> usize { self.counters.len() }

    pub fn is_empty(&self) -> bool { self.counters.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (Square, u8)> + '_ {
        self.counters.iter().map(|(s, c)| (*s, *c))
    }

    pub fn create(&mut self, sq: Square) { self.counters.insert(sq, 0); }

    pub fn clear(&mut self, sq: Square) { self.counters.remove(&sq); }

    pub fn reset(&mut self) { self.counters.clear(); }

    /// Carries a moving chimera's counter to its destination; an untracked chimera starts at 0.
    pub fn migrate(&mut self, from: Square, to: Square) {
        let c = self.counters.remove(&from).unwrap_or(0);
        self.counters.insert(to, c);
    }

    /// End-of-turn pass: drops entries whose square no longer holds a chimera, then advances
    /// the counters of `finished`'s chimeras, flipping those that reach [`CHIMERA_FLIP_AT`].
    /// Returns the squares whose chimera changed color.
    pub fn end_of_turn(&mut self, board: &mut Board, finished: Color) -> Vec<Square> {
        self.counters.retain(|sq, _| matches!(board.get(*sq), Some(p) if p.kind == PieceKind::Chimera));
        let mut flipped = Vec::new();
        for (sq, count) in self.counters.iter_mut() {
            let Some(p) = board.get(*sq) else { continue };
            if p.color != finished { continue; }
            *count = count.saturating_add(1);
            if *count >= CHIMERA_FLIP_AT {
                board.set(*sq, Some(p.flipped()));
                *count = 0;
                info!("chimera on {sq} changed loyalty to {}", p.color.flip());
                flipped.push(*sq);
            }
        }
        flipped
    }
}

/// What a move did to the board, for logging and callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    Plain,
    Capture(Piece),
    Fused(PieceKind),
    Merged,
    Castled,
    Promoted,
}

/// Applies a non-diplomacy move to the live position: tracker bookkeeping, castling rights,
/// then the fuse / merge / castle / promotion / plain branch. Diplomacy candidates are played
/// here as plain captures; use [`resolve_diplomacy`] to honor an accepted proposal.
pub fn apply_move(board: &mut Board, state: &mut GameState, tracker: &mut ChimeraTracker, mv: &Move) -> MoveEffect {
    let Some(piece) = board.get(mv.from) else { return MoveEffect::Plain };
    let color = piece.color;

    tracker.clear(mv.to);
    if piece.kind == PieceKind::Chimera {
        tracker.migrate(mv.from, mv.to);
    }
    update_castling_rights(board, state, mv, piece);

    let effect = match mv.special {
        Special::Fuse => MoveEffect::Fused(fuse(board, color, mv.from, mv.to)),
        Special::Merge => {
            merge(board, color, mv.from, mv.to);
            MoveEffect::Merged
        }
        Special::CastleShort | Special::CastleLong => {
            castle(board, color, mv.special);
            state.castling[color].king_moved = true;
            MoveEffect::Castled
        }
        Special::Diplomacy | Special::None => {
            let captured = board.get(mv.to);
            relocate(board, mv.from, mv.to);
            if promote_if_needed(board, mv.to) {
                MoveEffect::Promoted
            } else if let Some(c) = captured {
                MoveEffect::Capture(c)
            } else {
                MoveEffect::Plain
            }
        }
    };
    debug!("{} played {mv} ({effect:?})", color);
    effect
}

/// Resolves a pending diplomacy offer: accept makes a chimera of `proposer`'s color on `to`
/// with a fresh loyalty counter; decline is an ordinary capture.
pub fn resolve_diplomacy(
    board: &mut Board,
    state: &mut GameState,
    tracker: &mut ChimeraTracker,
    from: Square,
    to: Square,
    proposer: Color,
    accept: bool,
) {
    if accept {
        tracker.clear(to);
        board.take(from);
        board.set(to, Some(Piece::new(proposer, PieceKind::Chimera)));
        tracker.create(to);
        info!("chimera born on {to} for {proposer}");
    } else {
        let mv = Move::with_special(from, to, true, Special::Diplomacy);
        apply_move(board, state, tracker, &mv);
        info!("diplomacy declined on {to}; knight captured");
    }
}

/// Replaces a rook and bishop of one color with an archon bound to the destination's shade.
pub fn fuse(board: &mut Board, color: Color, from: Square, to: Square) -> PieceKind {
    let kind = PieceKind::archon_for(to.is_light());
    board.take(from);
    board.set(to, Some(Piece::new(color, kind)));
    info!("{color} fused an archon ({kind:?}) on {to}");
    kind
}

/// Replaces two knights of one color with a legion on the destination.
pub fn merge(board: &mut Board, color: Color, from: Square, to: Square) {
    board.take(from);
    board.set(to, Some(Piece::new(color, PieceKind::Legion)));
    info!("{color} merged a legion on {to}");
}

pub fn castle(board: &mut Board, color: Color, side: Special) {
    let row = color.back_rank();
    let (king_to, rook_from, rook_to) = match side {
        Special::CastleShort => (6, 7, 5),
        _ => (2, 0, 3),
    };
    relocate(board, Square::new(row, 4), Square::new(row, king_to));
    relocate(board, Square::new(row, rook_from), Square::new(row, rook_to));
}

/// A pawn on the farthest rank always becomes a queen.
pub fn promote_if_needed(board: &mut Board, sq: Square) -> bool {
    match board.get(sq) {
        Some(p) if p.kind == PieceKind::Pawn && sq.row() == p.color.promotion_rank() => {
            board.set(sq, Some(Piece::new(p.color, PieceKind::Queen)));
            info!("{} pawn promoted on {sq}", p.color);
            true
        }
        _ => false,
    }
}

/// Clears rook rights whose home corner no longer holds that color's rook.
pub fn refresh_rook_rights(board: &Board, state: &mut GameState) {
    for color in Color::ALL {
        let row = color.back_rank();
        let rook = Some(Piece::new(color, PieceKind::Rook));
        for col in [0u8, 7] {
            if board.get(Square::new(row, col)) != rook {
                state.castling[color].clear_rook_file(col);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resurrection {
    pub legions: usize,
    pub archons: usize,
}

/// Last-stand activation for `color`: rebuilds its army with legions and archons standing in
/// for the composites it had, and replaces the king with a Z-leader on file index 3.
pub fn resurrect(board: &mut Board, state: &mut GameState, tracker: &mut ChimeraTracker, color: Color) -> Resurrection {
    let mut legions = 0;
    let mut archons = 0;
    for (_, p) in board.pieces_of(color) {
        match p.kind {
            PieceKind::Legion | PieceKind::Chimera => legions += 1,
            k if k.is_archon() => archons += 1,
            _ => {}
        }
    }
    let counted = Resurrection { legions, archons };

    let own: Vec<Square> = board.pieces_of(color).map(|(sq, _)| sq).collect();
    for sq in own {
        board.take(sq);
        tracker.clear(sq);
    }

    let back = color.back_rank();
    let pawns = color.pawn_rank();
    for col in 0..8u8 {
        board.set(Square::new(pawns, col), Some(Piece::new(color, PieceKind::Pawn)));
        let sq = Square::new(back, col);
        let kind = match BACK_RANK[col as usize] {
            PieceKind::Knight if legions > 0 => {
                legions -= 1;
                PieceKind::Legion
            }
            PieceKind::Rook if archons > 0 => {
                archons -= 1;
                PieceKind::archon_for(sq.is_light())
            }
            k => k,
        };
        board.set(sq, Some(Piece::new(color, kind)));
    }
    board.take(Square::new(back, 4));
    board.set(Square::new(back, 3), Some(Piece::new(color, PieceKind::Leader)));

    // Enemy chimeras on the overwritten rows are gone too.
    for col in 0..8u8 {
        tracker.clear(Square::new(back, col));
        tracker.clear(Square::new(pawns, col));
    }
    state.leaders[color] = LeaderKind::ZLeader;
    state.revived[color] = true;
    info!("{color} entered last stand: {} legions, {} archons restored", counted.legions, counted.archons);
    counted
}

fn relocate(board: &mut Board, from: Square, to: Square) {
    let p = board.take(from);
    board.set(to, p);
}

fn update_castling_rights(board: &Board, state: &mut GameState, mv: &Move, piece: Piece) {
    let color = piece.color;
    match piece.kind {
        PieceKind::King => state.castling[color].king_moved = true,
        PieceKind::Rook if mv.from.row() == color.back_rank() => {
            state.castling[color].clear_rook_file(mv.from.col());
        }
        _ => {}
    }
    // Capturing a rook on its home corner.
    if let Some(t) = board.get(mv.to) {
        if t.kind == PieceKind::Rook && t.color != color && mv.to.row() == t.color.back_rank() {
            state.castling[t.color].clear_rook_file(mv.to.col());
        }
    }
}
