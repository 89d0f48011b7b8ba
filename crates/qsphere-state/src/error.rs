//! Error types for the state crate.

use qsphere_gates::{GateError, LinalgError};
use thiserror::Error;

/// Errors raised while building, evolving or analysing a state.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// Qubit count is zero or beyond what can be allocated.
    #[error("Invalid qubit count {num_qubits} (supported: 1..={max})")]
    InvalidQubitCount {
        /// Requested number of qubits.
        num_qubits: usize,
        /// Largest supported register.
        max: usize,
    },

    /// A qubit index is outside the register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending index.
        qubit: usize,
        /// Register size.
        num_qubits: usize,
    },

    /// The same qubit appears twice in one gate application.
    #[error("Duplicate qubit {qubit} in gate '{gate}'")]
    DuplicateQubit {
        /// The repeated index.
        qubit: usize,
        /// Gate being applied.
        gate: String,
    },

    /// Gate was applied without target qubits.
    #[error("Gate '{gate}' applied to no qubits")]
    NoTargets {
        /// Gate being applied.
        gate: String,
    },

    /// Gate matrix dimension does not match `2^k` for `k` targets.
    #[error("Gate '{gate}' has a {got}x{got} matrix but {targets} target qubit(s) need {expected}x{expected}")]
    DimensionMismatch {
        /// Gate being applied.
        gate: String,
        /// Number of target qubits supplied.
        targets: usize,
        /// Required dimension `2^targets`.
        expected: usize,
        /// Actual matrix dimension.
        got: usize,
    },

    /// Amplitude vector length is not a power of two.
    #[error("Amplitude vector length {0} is not a power of two")]
    InvalidLength(usize),

    /// State has (numerically) zero norm and cannot be normalized.
    #[error("State has zero norm")]
    ZeroNorm,

    /// Operation is only defined for two-qubit systems.
    #[error("Operation requires exactly 2 qubits, got {0}")]
    NotTwoQubit(usize),

    /// Matrix is not a valid density matrix.
    #[error("Invalid density matrix: {0}")]
    InvalidDensityMatrix(String),

    /// Unrecognised initial-state label.
    #[error("Unknown initial state '{0}'")]
    UnknownInitialState(String),

    /// Gate lookup or construction failed.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Linear-algebra helper failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;
