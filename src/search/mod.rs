pub mod eval;
pub mod noise;
pub mod safety;
pub mod selector;

pub use selector::{select_move, ScoredMove, SelectorParams};
