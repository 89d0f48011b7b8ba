//! Error types for the gates crate.

use thiserror::Error;

/// Errors raised by the dense linear-algebra helpers.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum LinalgError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("Shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Operation name.
        op: &'static str,
        /// Shape of the left operand.
        left: (usize, usize),
        /// Shape of the right operand.
        right: (usize, usize),
    },

    /// Operation requires a square matrix.
    #[error("{op} requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Operation name.
        op: &'static str,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Operation requires a Hermitian matrix.
    #[error("{op} requires a Hermitian matrix")]
    NotHermitian {
        /// Operation name.
        op: &'static str,
    },

    /// Iterative eigensolver ran out of sweeps.
    #[error("Eigensolver did not converge after {sweeps} sweeps (off-diagonal norm {residual:e})")]
    NoConvergence {
        /// Sweeps performed.
        sweeps: usize,
        /// Remaining off-diagonal Frobenius norm.
        residual: f64,
    },
}

/// Errors raised by gate lookup and construction.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum GateError {
    /// Gate name is not in the catalogue.
    #[error("Unknown gate '{name}'")]
    UnknownGate {
        /// The name as requested.
        name: String,
    },

    /// Too many parameters for the gate.
    #[error("Gate '{gate}' takes at most {expected} parameter(s), got {got}")]
    ParameterCount {
        /// Canonical gate name.
        gate: &'static str,
        /// Maximum number of parameters accepted.
        expected: usize,
        /// Number supplied.
        got: usize,
    },

    /// Parameter is NaN or infinite.
    #[error("Gate '{gate}' received non-finite parameter {value}")]
    InvalidParameter {
        /// Canonical gate name.
        gate: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Result type for linear-algebra helpers.
pub type LinalgResult<T> = Result<T, LinalgError>;

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
