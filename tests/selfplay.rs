use chimera::selfplay::{generate_games, play_game, read_records, write_records, SelfPlayParams};
use std::fs::{create_dir_all, remove_file};

fn params(seed: u64) -> SelfPlayParams {
    SelfPlayParams { games: 2, max_plies: 40, threads: 1, seed, resurrect: true }
}

#[test]
fn selfplay_generates_games_deterministically() {
    let p = params(42);
    let g1 = generate_games(&p);
    let g2 = generate_games(&p);
    assert_eq!(g1.len(), 2);
    assert_eq!(g1, g2);
    for g in &g1 {
        assert_eq!(g.moves.len(), g.plies);
        assert!(g.plies <= 40);
        assert!(!g.final_placement.is_empty());
    }
}

#[test]
fn threads_do_not_change_the_games() {
    let seq = generate_games(&params(9));
    let par = generate_games(&SelfPlayParams { threads: 2, ..params(9) });
    assert_eq!(seq, par);
}

#[test]
fn game_index_picks_the_seed() {
    let p = params(3);
    assert_eq!(generate_games(&p)[1], play_game(&p, 1));
}

#[test]
fn different_seeds_play_different_games() {
    let games: Vec<Vec<String>> = (1..=3)
        .map(|seed| play_game(&SelfPlayParams { max_plies: 12, ..params(seed) }, 0).moves)
        .collect();
    assert!(games.iter().any(|g| g != &games[0]), "noise did not alter move choice");
}

#[test]
fn write_and_read_records() {
    let games = generate_games(&SelfPlayParams { games: 3, max_plies: 8, ..params(123) });
    let outdir = std::path::Path::new("target/selfplay_test");
    create_dir_all(outdir).unwrap();
    let path = outdir.join("records.jsonl");
    write_records(&games, &path).unwrap();
    let back = read_records(&path).unwrap();
    assert_eq!(back, games);
    remove_file(&path).unwrap();
}
