//! Errors a move request can end with.

/// Failure of a single `get_best_move` call. Nothing is left applied when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The notation did not parse into a legal position. Caller's fault.
    #[error("Invalid FEN string: {0}")]
    InvalidPosition(String),

    /// A position that is not game-over produced no legal moves.
    #[error("No valid moves found")]
    NoLegalMove,
}

impl EngineError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::InvalidPosition(_))
    }

    /// HTTP-style status for adapters: 400 for bad input, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}
