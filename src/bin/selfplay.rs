use chimera::selfplay::{generate_games_with_progress, write_records, SelfPlayParams};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chimera-selfplay", about = "Play AI-vs-AI games and write them as JSON lines")]
struct Args {
    #[arg(long, default_value_t = 100)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Do not let a checkmated side resurrect
    #[arg(long)]
    no_resurrect: bool,
    #[arg(long, default_value = "out/selfplay.jsonl")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = SelfPlayParams {
        games: a.games,
        max_plies: a.max_plies,
        threads: a.threads,
        seed: a.seed,
        resurrect: !a.no_resurrect,
    };
    eprintln!("Generating {} games (max_plies={}, threads={}, resurrect={})", a.games, a.max_plies, a.threads, params.resurrect);

    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} games {msg}")?);
    let games = generate_games_with_progress(&params, |_| pb.inc(1));
    pb.finish_and_clear();

    let white = games.iter().filter(|g| g.result > 0).count();
    let black = games.iter().filter(|g| g.result < 0).count();
    let revived: usize = games.iter().map(|g| g.resurrections.len()).sum();
    eprintln!("white {white} / black {black} / other {} ; {revived} resurrections", games.len() - white - black);

    if let Some(dir) = a.out.parent() {
        std::fs::create_dir_all(dir)?;
    }
    write_records(&games, &a.out)?;
    eprintln!("Wrote {}", a.out.display());
    Ok(())
}
