//! Engine-fatal error taxonomy
//!
//! Only genuinely recoverable-by-the-caller conditions live here:
//! configuration rejected at initialization, state-machine misuse, and
//! census stream I/O. Invariant violations inside the engine (bad bit
//! counts, count underflow, double claims) are programming errors and
//! panic instead.

use crate::sim::SimPhase;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{operation} is not valid in phase {phase:?}")]
    InvalidPhase {
        phase: SimPhase,
        operation: &'static str,
    },

    #[error("census write failed")]
    Census(#[from] std::io::Error),
}
