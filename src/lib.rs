// Chess variant engine: fused pieces, knight diplomacy, morale and a last-stand mode.
pub mod board;
pub mod error;
pub mod frontend;
pub mod morale;
pub mod perft;
pub mod rules;
pub mod search;
pub mod selfplay;
pub mod session;
pub mod wire;

pub use board::{Board, ByColor, Color, Piece, PieceKind, Square};
pub use error::ChimeraError;
pub use session::{ClickOutcome, GameSession, Outcome, Phase, SessionConfig};
