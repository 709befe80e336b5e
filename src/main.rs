use anyhow::{bail, Result};
use chimera::frontend::{EndModal, Modals, Relay, RenderView, Renderer};
use chimera::rules::GameState;
use chimera::session::{ClickOutcome, GameSession, PendingProposal, SessionConfig};
use chimera::{Board, Color, Square};
use clap::Parser;
use std::io::{self, Write};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play the chimera chess variant in the terminal", long_about = None)]
struct Args {
    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Two players at one keyboard, no computer opponent
    #[arg(long)]
    hotseat: bool,

    /// Computer "thinking" pause in milliseconds
    #[arg(long, default_value_t = 150)]
    delay_ms: u64,

    /// Seed for morale rolls and move noise
    #[arg(long)]
    seed: Option<u64>,

    /// Starting placement (e.g. rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR)
    #[arg(long)]
    placement: Option<String>,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => bail!("Invalid color: use 'w' or 'b'"),
    }
}

/// Prints everything to stdout. Offline only.
struct Terminal;

impl Renderer for Terminal {
    fn render(&mut self, view: &RenderView<'_>) {
        if let Some(sq) = view.selected {
            let targets: Vec<String> = view.moves.iter().map(|m| m.to_string()).collect();
            println!("{sq}: {}", if targets.is_empty() { "no moves".to_string() } else { targets.join(" ") });
            return;
        }
        println!("\n{}", view.board);
        if let Some(m) = view.last_move {
            println!("last move {}{}", m.from, m.to);
        }
        println!(
            "{} to move | losses white {} black {} | move {}",
            view.state.turn, view.material_loss.white, view.material_loss.black, view.state.move_count
        );
    }
}

impl Modals for Terminal {
    fn show_end_modal(&mut self, modal: EndModal) {
        match modal.winner {
            Some(w) if modal.is_checkmate => println!("Checkmate! {w} wins."),
            _ => println!("Stalemate."),
        }
        if modal.resurrection_allowed {
            println!("Type 'r' to raise the fallen army under a Z-leader.");
        }
        println!("Type 'n' for a new game or 'q' to quit.");
    }

    fn show_diplomacy_modal(&mut self, p: &PendingProposal) {
        println!("{} offers an alliance on {}. Accept with 'a', decline with 'd'.", p.proposer, p.to);
    }
}

impl Relay for Terminal {}

/// Splits `e2e4` into its two squares.
fn parse_move(s: &str) -> Option<(Square, Square)> {
    let from = Square::from_algebraic(s.get(0..2)?).ok()?;
    let to = Square::from_algebraic(s.get(2..4)?).ok()?;
    Some((from, to))
}

fn print_help() {
    println!("Commands: e2e4 (move), a/d (answer an alliance), r (resurrect), n (new game), ai (toggle computer), q (quit)");
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let human_color = parse_color(&args.color)?;

    let config = SessionConfig {
        ai_enabled: !args.hotseat,
        ai_color: human_color.flip(),
        ai_delay: Duration::from_millis(args.delay_ms),
        seed: args.seed,
        ..Default::default()
    };
    let board = match args.placement {
        Some(p) => Board::from_placement(&p)?,
        None => Board::startpos(),
    };
    let mut session = GameSession::from_position(Terminal, config, board, GameState::new());
    print_help();

    loop {
        while session.ai_pending() {
            std::thread::sleep(config.ai_delay);
            session.tick(Instant::now());
        }

        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        match input.trim() {
            "q" | "quit" => break,
            "n" => session.reset(),
            "r" => {
                if let Err(e) = session.activate_last_stand() {
                    println!("{e}");
                }
            }
            "a" => {
                if let Err(e) = session.accept_proposal() {
                    println!("{e}");
                }
            }
            "d" => {
                if let Err(e) = session.decline_proposal() {
                    println!("{e}");
                }
            }
            "ai" => {
                let on = session.toggle_ai();
                println!("computer opponent {}", if on { "on" } else { "off" });
            }
            mv if mv.len() == 4 => {
                let Some((from, to)) = parse_move(mv) else {
                    println!("Invalid move format! Use format like 'e2e4'");
                    continue;
                };
                session.clear_selection();
                if !matches!(session.click(from), ClickOutcome::Selected(_)) {
                    println!("No piece of yours can move from {from}.");
                    continue;
                }
                match session.click(to) {
                    ClickOutcome::Applied(_) | ClickOutcome::Proposed(_) => {}
                    _ => {
                        session.clear_selection();
                        println!("Illegal move!");
                    }
                }
            }
            _ => print_help(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_moves() {
        let (from, to) = parse_move("e2e4").unwrap();
        assert_eq!((from.to_string(), to.to_string()), ("e2".to_string(), "e4".to_string()));
        assert!(parse_move("e2e9").is_none());
        // Four bytes, but not four characters.
        assert!(parse_move("a\u{e9}1").is_none());
    }
}
