mod common;

use chimera::rules::movegen::simulate;
use chimera::rules::{in_check, GameState, LeaderKind};
use chimera::search::selector::candidate_moves;
use chimera::search::{select_move, SelectorParams};
use chimera::{Board, Color};
use common::sq;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn never_plays_a_special_move() {
    // Fuse, merge and diplomacy are all on offer for white here.
    let b = Board::from_placement("4k3/8/8/3n4/8/4N3/6N1/R1B1K3").unwrap();
    let s = GameState::new();
    for seed in 0..32 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let best = select_move(&b, &s, Color::White, &SelectorParams::default(), &mut rng).unwrap();
        assert!(!best.mv.is_special_only(), "seed {seed}: {}", best.mv);
        assert!(!best.mv.is_castle(), "seed {seed}: {}", best.mv);
    }
}

#[test]
fn every_candidate_answers_check() {
    let b = Board::from_placement("4k3/8/8/8/8/8/8/r3K3").unwrap();
    let s = GameState::new();
    assert!(in_check(&b, Color::White, LeaderKind::King));
    let moves = candidate_moves(&b, &s, Color::White);
    let mut targets: Vec<String> = moves.iter().map(|m| m.to.to_string()).collect();
    targets.sort();
    assert_eq!(targets, vec!["d2", "e2", "f2"]);
    for m in &moves {
        assert!(!in_check(&simulate(&b, m), Color::White, LeaderKind::King), "{m}");
    }
    let mut rng = SmallRng::seed_from_u64(5);
    let best = select_move(&b, &s, Color::White, &SelectorParams::default(), &mut rng).unwrap();
    assert_eq!(best.mv.from, sq("e1"));
}

#[test]
fn stalemated_side_has_no_pick() {
    let b = Board::from_placement("7k/5Q2/6K1/8/8/8/8/8").unwrap();
    let mut s = GameState::new();
    s.turn = Color::Black;
    assert!(candidate_moves(&b, &s, Color::Black).is_empty());
    let mut rng = SmallRng::seed_from_u64(0);
    assert!(select_move(&b, &s, Color::Black, &SelectorParams::default(), &mut rng).is_none());
}

#[test]
fn zero_noise_is_seed_independent() {
    let b = Board::startpos();
    let s = GameState::new();
    let params = SelectorParams { noise: 0.0, ..Default::default() };
    let pick = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        select_move(&b, &s, Color::White, &params, &mut rng).unwrap()
    };
    let first = pick(1);
    for seed in 2..10 {
        assert_eq!(pick(seed), first);
    }
}

#[test]
fn the_z_leader_is_protected_like_a_king() {
    // Last stand: the leader on d1 is attacked along the first rank.
    let b = Board::from_placement("4k3/8/8/8/8/8/PPP5/3Z3r").unwrap();
    let mut s = GameState::new();
    s.leaders[Color::White] = LeaderKind::ZLeader;
    s.revived[Color::White] = true;
    assert!(in_check(&b, Color::White, LeaderKind::ZLeader));
    for m in candidate_moves(&b, &s, Color::White) {
        assert!(!in_check(&simulate(&b, &m), Color::White, LeaderKind::ZLeader), "{m}");
    }
}
