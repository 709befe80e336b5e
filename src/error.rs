use thiserror::Error;

/// Errors surfaced by the engine's public entry points.
#[derive(Debug, Error)]
pub enum ChimeraError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid board placement: {0}")]
    InvalidPlacement(String),

    #[error("no diplomacy proposal is pending")]
    NoPendingProposal,

    #[error("the proposal is waiting for the remote player")]
    AwaitingRemoteDecision,

    #[error("resurrection is not available")]
    ResurrectionUnavailable,

    #[error("action belongs to the {0} seat")]
    NotYourSeat(crate::board::Color),

    #[error("wire payload: {0}")]
    Wire(#[from] serde_json::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}
