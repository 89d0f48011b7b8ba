//! Error types for the sim crate.

use qsphere_gates::GateError;
use qsphere_state::StateError;
use thiserror::Error;

/// Errors raised while loading, validating or executing a circuit.
///
/// [`Simulator::run`](crate::Simulator::run) never returns these; it folds
/// them into a failed [`SimulationResult`](crate::SimulationResult).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// State construction, gate application or analysis failed.
    #[error(transparent)]
    State(#[from] StateError),

    /// Gate lookup failed.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// The run was cancelled between two gate applications.
    #[error("simulation cancelled")]
    Cancelled,

    /// The circuit description is structurally invalid.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// The configuration is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A circuit or configuration document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reading a circuit or configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e.to_string())
    }
}

impl From<serde_yaml_ng::Error> for SimError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        SimError::Parse(e.to_string())
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
