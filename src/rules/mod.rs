pub mod attacks;
pub mod mechanics;
pub mod movegen;
pub mod state;

pub use attacks::{in_check, square_attacked, square_defended};
pub use mechanics::{ChimeraTracker, MoveEffect};
pub use movegen::{legal_moves, moves_from, Move, Special};
pub use state::{CastlingRights, GameState, LeaderKind, Mode};
