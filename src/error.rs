//! Fatal error kinds
//!
//! Only two things can actually fail: match setup, and an invariant the
//! resolution clamps are supposed to make unreachable. Invalid order
//! parameters and decision timeouts are journaled events, not errors.

use thiserror::Error;

/// Match startup failure, reported before any tick runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("a match needs at least 2 bots, got {0}")]
    NotEnoughBots(usize),
    #[error("duplicate bot name: {0}")]
    DuplicateName(String),
}

/// Fatal match failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// A programming-defect class that should never surface at runtime; the
    /// match aborts rather than continuing with corrupted state.
    #[error("simulation invariant violated: {0}")]
    InvariantViolation(String),
}
