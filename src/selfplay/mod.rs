//! AI-versus-AI games for exercising the rules engine end to end.

use crate::board::Color;
use crate::error::ChimeraError;
use crate::frontend::Headless;
use crate::session::{GameSession, Outcome, SessionConfig};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_plies: usize,
    pub threads: usize,
    pub seed: u64,
    /// Let a checkmated side use its one resurrection instead of ending the game.
    pub resurrect: bool,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        Self { games: 10, max_plies: 200, threads: 1, seed: 42, resurrect: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub moves: Vec<String>,
    pub result: i8, // 1 white win, 0 draw or unfinished, -1 black win
    pub plies: usize,
    pub resurrections: Vec<Color>,
    pub final_placement: String,
}

/// Plays one game. Game `gi` is seeded with `seed ^ gi`, so a game depends only on its index.
pub fn play_game(params: &SelfPlayParams, gi: usize) -> GameRecord {
    let config = SessionConfig { ai_enabled: false, seed: Some(params.seed ^ gi as u64), ..Default::default() };
    let mut session = GameSession::new(Headless, config);
    let mut record = GameRecord { moves: Vec::new(), result: 0, plies: 0, resurrections: Vec::new(), final_placement: String::new() };

    while record.plies < params.max_plies {
        if let Some(outcome) = session.outcome() {
            match outcome {
                Outcome::Checkmate { loser, resurrection_allowed: true } if params.resurrect => {
                    match session.activate_last_stand() {
                        Ok(_) => {
                            record.resurrections.push(loser);
                            continue;
                        }
                        Err(e) => warn!("game {gi}: resurrection refused: {e}"),
                    }
                    record.result = if loser == Color::White { -1 } else { 1 };
                }
                Outcome::Checkmate { loser, .. } => record.result = if loser == Color::White { -1 } else { 1 },
                Outcome::Stalemate => record.result = 0,
            }
            break;
        }
        match session.play_ai_move() {
            Some(mv) => {
                record.moves.push(mv.to_string());
                record.plies += 1;
            }
            // No selector candidate; settle the position or stop.
            None => {
                if session.check_game_state().is_none() { break; }
            }
        }
    }
    record.final_placement = session.board().placement();
    debug!("game {gi}: {} plies, result {}", record.plies, record.result);
    record
}

pub fn generate_games(params: &SelfPlayParams) -> Vec<GameRecord> {
    generate_games_with_progress(params, |_| {})
}

/// Like [`generate_games`], calling `on_game` as each game finishes (in completion order).
pub fn generate_games_with_progress<C>(params: &SelfPlayParams, on_game: C) -> Vec<GameRecord>
where
    C: Fn(&GameRecord) + Sync,
{
    let run = |gi: usize| {
        let g = play_game(params, gi);
        on_game(&g);
        g
    };
    if params.threads > 1 {
        match rayon::ThreadPoolBuilder::new().num_threads(params.threads).build() {
            Ok(pool) => return pool.install(|| (0..params.games).into_par_iter().map(&run).collect()),
            Err(e) => warn!("thread pool unavailable ({e}); playing sequentially"),
        }
    }
    (0..params.games).map(&run).collect()
}

/// Writes one JSON record per line.
pub fn write_records<P: AsRef<Path>>(games: &[GameRecord], path: P) -> Result<(), ChimeraError> {
    let mut w = BufWriter::new(File::create(path)?);
    for g in games {
        serde_json::to_writer(&mut w, g)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<GameRecord>, ChimeraError> {
    let r = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for line in r.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}
