//! qsphere statevector engine
//!
//! Pure-state simulation over `2^n` complex amplitudes, plus the analysis
//! that turns a final state into per-qubit diagnostics.
//!
//! # Features
//!
//! - **Generic gate application**: any `2^k × 2^k` unitary on any `k`
//!   distinct qubits, applied in place
//! - **Initial-state presets**: |0⟩, |1⟩, |±⟩, |±i⟩ or custom amplitudes
//!   on qubit 0
//! - **Reduced states**: linear-time partial trace onto a single qubit,
//!   Bloch vector, purity, von Neumann entropy
//! - **Entanglement**: Wootters concurrence for two-qubit density matrices
//!   and a qubit-versus-rest measure for larger registers
//!
//! # Memory
//!
//! | Qubits | Amplitudes | Full density matrix |
//! |--------|------------|---------------------|
//! | 10 | ~16 KB | ~16 MB |
//! | 15 | ~512 KB | ~16 GB |
//! | 20 | ~16 MB | not materialized |
//!
//! # Example
//!
//! ```rust
//! use qsphere_state::{InitialState, StateVector};
//!
//! let mut sv = StateVector::new(2).unwrap();
//! sv.initialize(&InitialState::Plus).unwrap();
//! sv.apply_named("cx", &[0, 1], &[]).unwrap();
//!
//! let rho = sv.reduced_density_matrix(1).unwrap();
//! assert!((rho.purity() - 0.5).abs() < 1e-12);
//! assert!(rho.bloch_vector().norm() < 1e-12);
//! ```

pub mod density;
pub mod entanglement;
pub mod error;
pub mod initial;
pub mod statevector;

pub use density::{BlochVector, DensityMatrix, ReducedDensityMatrix};
pub use entanglement::{
    DEFAULT_ENTANGLEMENT_THRESHOLD, ENTROPY_CUTOFF, concurrence, entropy_from_eigenvalues,
    is_entangled, qubit_concurrence, witness_value,
};
pub use error::{StateError, StateResult};
pub use initial::InitialState;
pub use statevector::{MAX_QUBITS, MeasurementOutcome, StateVector};
