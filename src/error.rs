//! Runtime error types
//!
//! Game actions never fail: invalid moves are silent no-ops. Errors are
//! reserved for host misuse and bad configuration.

use thiserror::Error;

use crate::sim::GameKind;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The handle was disposed; the host must mount a new one
    #[error("{kind} session was disposed; mount a new game to play again")]
    Disposed { kind: GameKind },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
