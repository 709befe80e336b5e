use chimera::perft::{divide, perft};
use chimera::rules::mechanics::{apply_move, ChimeraTracker};
use chimera::rules::{legal_moves, GameState};
use chimera::{Board, Color};
use clap::Parser;
use rayon::prelude::*;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Perft driver for the chimera move generator")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// Board placement or "startpos"
    #[arg(value_name = "PLACEMENT", default_value = "startpos")]
    placement: String,
    /// Side to move: 'w' or 'b'
    #[arg(long, default_value = "w")]
    turn: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print node counts per root move
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let board = if args.placement == "startpos" { Board::startpos() } else { Board::from_placement(&args.placement)? };
    let mut state = GameState::new();
    state.turn = match args.turn.as_str() {
        "b" | "black" => Color::Black,
        _ => Color::White,
    };

    if args.divide {
        for (mv, n) in divide(&board, &state, args.depth) {
            println!("{mv}: {n}");
        }
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let (nodes, dt) = pool.install(|| {
        let t0 = Instant::now();
        let nodes = if args.threads <= 1 || args.depth == 0 {
            perft(&board, &state, args.depth)
        } else {
            legal_moves(&board, &state, state.turn)
                .par_iter()
                .map(|m| {
                    let mut child = board;
                    let mut st = state.clone();
                    apply_move(&mut child, &mut st, &mut ChimeraTracker::new(), m);
                    st.turn = st.turn.flip();
                    perft(&child, &st, args.depth - 1)
                })
                .sum()
        };
        (nodes, t0.elapsed().as_secs_f64())
    });

    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}
