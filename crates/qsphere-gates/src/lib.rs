//! `qsphere-gates`: the pure, stateless layer under the simulator.
//!
//! - [`complex`]: scalar complex helpers on top of `num_complex::Complex64`
//! - [`linalg`]: shape-checked dense matrix operations and a Hermitian
//!   Jacobi eigensolver
//! - [`gate`]: the named unitary catalogue, fixed and parameterized
//!
//! # Example
//!
//! ```rust
//! use qsphere_gates::{Gate, GateKind, is_two_qubit};
//!
//! let rx = Gate::from_name("RX", &[std::f64::consts::PI]).unwrap();
//! assert_eq!(rx.kind(), GateKind::Rx);
//! assert_eq!(rx.dimension(), 2);
//! assert!(is_two_qubit("cnot"));
//! assert!(Gate::from_name("warp", &[]).is_err());
//! ```

pub mod complex;
pub mod error;
pub mod gate;
pub mod linalg;

pub use complex::{Complex64, ComplexExt};
pub use error::{GateError, GateResult, LinalgError, LinalgResult};
pub use gate::{
    DEFAULT_ANGLE, Gate, GateKind, catalogue, is_single_qubit, is_two_qubit, required_qubits,
};
pub use linalg::Matrix;
