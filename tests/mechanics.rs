mod common;

use chimera::rules::mechanics::{apply_move, resurrect, ChimeraTracker, MoveEffect, Resurrection};
use chimera::rules::movegen::{moves_from, Special};
use chimera::rules::{GameState, LeaderKind};
use chimera::session::{ClickOutcome, GameSession};
use chimera::{Board, Color, Piece, PieceKind};
use common::{offline, play, sq, Recorder};
use pretty_assertions::assert_eq;

fn fuse_from(placement: &str, from: &str) -> (Board, MoveEffect) {
    let mut b = Board::from_placement(placement).unwrap();
    let mut s = GameState::new();
    let mv = moves_from(&b, &s, sq(from), true).into_iter().find(|m| m.special == Special::Fuse).unwrap();
    let effect = apply_move(&mut b, &mut s, &mut ChimeraTracker::new(), &mv);
    (b, effect)
}

#[test]
fn rook_into_bishop_fuses_by_destination_shade() {
    // c1 is dark.
    let (b, effect) = fuse_from("4k3/8/8/8/8/8/8/R1B1K3", "a1");
    assert_eq!(effect, MoveEffect::Fused(PieceKind::ArchonDark));
    assert_eq!(b.placement(), "4k3/8/8/8/8/8/8/2C1K3");
}

#[test]
fn bishop_into_rook_fuses_by_destination_shade() {
    // f3 is light.
    let (b, effect) = fuse_from("4k3/8/8/8/8/5R2/8/3B1K2", "d1");
    assert_eq!(effect, MoveEffect::Fused(PieceKind::ArchonLight));
    assert_eq!(b.get(sq("f3")), Some(Piece::new(Color::White, PieceKind::ArchonLight)));
    assert!(b.is_empty(sq("d1")));
    assert_eq!(b.count(Piece::new(Color::White, PieceKind::Rook)), 0);
    assert_eq!(b.count(Piece::new(Color::White, PieceKind::Bishop)), 0);
}

#[test]
fn two_knights_merge_into_one_legion() {
    let mut b = Board::from_placement("4k3/8/8/8/8/4N3/6N1/4K3").unwrap();
    let mut s = GameState::new();
    let mv = moves_from(&b, &s, sq("e3"), true).into_iter().find(|m| m.to == sq("g2")).unwrap();
    assert_eq!(mv.special, Special::Merge);
    assert_eq!(apply_move(&mut b, &mut s, &mut ChimeraTracker::new(), &mv), MoveEffect::Merged);
    assert_eq!(b.placement(), "4k3/8/8/8/8/8/6H1/4K3");
}

#[test]
fn nothing_but_knights_merges() {
    // Bishops, rooks and queens stop at friendly pieces of their own kind.
    let b = Board::from_placement("4k3/8/8/8/8/8/1B1Q1R2/B2QK2R").unwrap();
    let s = GameState::new();
    for from in ["a1", "b2", "d1", "d2", "f2", "h1"] {
        assert!(
            moves_from(&b, &s, sq(from), true).iter().all(|m| !matches!(m.special, Special::Merge)),
            "{from} produced a merge"
        );
    }
}

const DIPLOMACY: &str = "4k3/8/8/3n4/8/4N3/8/4K3";

fn proposal_session() -> GameSession<Recorder> {
    let board = Board::from_placement(DIPLOMACY).unwrap();
    let mut session = GameSession::from_position(Recorder::default(), offline(), board, GameState::new());
    assert!(matches!(play(&mut session, "e3d5"), ClickOutcome::Proposed(_)));
    session
}

#[test]
fn accepted_alliance_creates_a_chimera_that_changes_sides() {
    let mut session = proposal_session();
    assert_eq!(session.frontend().proposals_shown.len(), 1);
    session.accept_proposal().unwrap();

    let white_x = Some(Piece::new(Color::White, PieceKind::Chimera));
    assert_eq!(session.board().get(sq("d5")), white_x);
    assert!(session.board().is_empty(sq("e3")));
    // Counted once at the end of the turn that created it.
    assert_eq!(session.tracker().get(sq("d5")), Some(1));
    assert_eq!(session.state().turn, Color::Black);

    // Black's turn leaves white chimeras alone.
    assert!(matches!(play(&mut session, "e8d8"), ClickOutcome::Applied(_)));
    assert_eq!(session.board().get(sq("d5")), white_x);
    assert_eq!(session.tracker().get(sq("d5")), Some(1));

    // White's next completed turn flips it.
    assert!(matches!(play(&mut session, "e1e2"), ClickOutcome::Applied(_)));
    assert_eq!(session.board().get(sq("d5")), Some(Piece::new(Color::Black, PieceKind::Chimera)));
    assert_eq!(session.tracker().get(sq("d5")), Some(0));
}

#[test]
fn declined_alliance_is_a_capture() {
    let mut session = proposal_session();
    session.decline_proposal().unwrap();
    assert_eq!(session.board().placement(), "4k3/8/8/3N4/8/8/8/4K3");
    assert!(session.tracker().is_empty());
    assert_eq!(session.state().move_count, 1);
}

#[test]
fn moving_chimera_carries_its_counter() {
    let mut session = proposal_session();
    session.accept_proposal().unwrap();
    play(&mut session, "e8d8");
    // d5 -> h4 is a long jump.
    assert!(matches!(play(&mut session, "d5h4"), ClickOutcome::Applied(_)));
    assert!(session.tracker().get(sq("d5")).is_none());
    // Moved and then flipped at the end of the same turn.
    assert_eq!(session.board().get(sq("h4")), Some(Piece::new(Color::Black, PieceKind::Chimera)));
    assert_eq!(session.tracker().get(sq("h4")), Some(0));
}

#[test]
fn resurrection_reskins_knights_and_rooks() {
    let mut b = Board::from_placement("4k3/8/8/8/8/2X5/2H5/A3K3").unwrap();
    let mut s = GameState::new();
    let mut t = ChimeraTracker::new();
    t.create(sq("c3"));
    let counted = resurrect(&mut b, &mut s, &mut t, Color::White);
    assert_eq!(counted, Resurrection { legions: 2, archons: 1 });
    // a1 is dark, so the archon is dark-bound; the Z-leader takes d1 and e1 is left empty.
    assert_eq!(b.placement(), "4k3/8/8/8/8/8/PPPPPPPP/CHBZ1BHR");
    assert_eq!(s.leader_kind(Color::White), LeaderKind::ZLeader);
    assert!(s.revived[Color::White]);
    assert!(!s.resurrection_allowed(Color::White));
    assert_eq!(s.leader_kind(Color::Black), LeaderKind::King);
    assert!(t.is_empty());
}

#[test]
fn black_resurrection_uses_its_own_ranks() {
    let mut b = Board::from_placement("c3k3/8/8/8/8/8/8/4K3").unwrap();
    let mut s = GameState::new();
    let counted = resurrect(&mut b, &mut s, &mut ChimeraTracker::new(), Color::Black);
    assert_eq!(counted, Resurrection { legions: 0, archons: 1 });
    // a8 is light.
    assert_eq!(b.placement(), "anbz1bnr/pppppppp/8/8/8/8/8/4K3");
    assert_eq!(s.leader_kind(Color::Black), LeaderKind::ZLeader);
}
