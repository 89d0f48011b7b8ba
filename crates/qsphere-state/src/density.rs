//! Density matrices, partial traces and Bloch vectors.
//!
//! The full density matrix `ρ = |ψ⟩⟨ψ|` is `2^n × 2^n`, so building it is
//! the one quadratic-cost step in the simulator. Per-qubit reports do not
//! need it: [`ReducedDensityMatrix::from_state`] evaluates the same partial
//! trace straight from the amplitudes in linear time.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qsphere_gates::complex::ZERO;
use qsphere_gates::linalg::{self, Matrix};

use crate::entanglement;
use crate::error::{StateError, StateResult};
use crate::statevector::StateVector;

/// A point in (or on) the Bloch ball.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlochVector {
    /// ⟨X⟩
    pub x: f64,
    /// ⟨Y⟩
    pub y: f64,
    /// ⟨Z⟩
    pub z: f64,
}

impl BlochVector {
    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length clamped to the unit ball.
    pub fn radius(&self) -> f64 {
        self.norm().min(1.0)
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

/// The 2×2 density matrix of a single qubit with the rest traced out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedDensityMatrix {
    rho: [[Complex64; 2]; 2],
}

impl ReducedDensityMatrix {
    /// Wrap explicit entries `ρ[j][k]`.
    pub fn from_elements(rho: [[Complex64; 2]; 2]) -> Self {
        Self { rho }
    }

    /// Partial trace of `|ψ⟩⟨ψ|` onto `qubit`, computed from amplitudes.
    ///
    /// `ρ[j][k] = Σ ψ(rest, j) · conj(ψ(rest, k))`, summed over every
    /// assignment of the other qubits.
    pub fn from_state(state: &StateVector, qubit: usize) -> StateResult<Self> {
        if qubit >= state.num_qubits() {
            return Err(StateError::QubitOutOfRange {
                qubit,
                num_qubits: state.num_qubits(),
            });
        }
        let mask = 1 << qubit;
        let amps = state.amplitudes();

        let mut rho00 = 0.0;
        let mut rho11 = 0.0;
        let mut rho01 = ZERO;
        for base in (0..amps.len()).filter(|i| i & mask == 0) {
            let a0 = amps[base];
            let a1 = amps[base | mask];
            rho00 += a0.norm_sqr();
            rho11 += a1.norm_sqr();
            rho01 += a0 * a1.conj();
        }

        Ok(Self {
            rho: [
                [Complex64::new(rho00, 0.0), rho01],
                [rho01.conj(), Complex64::new(rho11, 0.0)],
            ],
        })
    }

    /// Entry `ρ[j][k]`.
    pub fn element(&self, j: usize, k: usize) -> Complex64 {
        self.rho[j][k]
    }

    /// As an `ndarray` matrix.
    pub fn to_matrix(&self) -> Matrix {
        Array2::from_shape_fn((2, 2), |(j, k)| self.rho[j][k])
    }

    /// `Tr ρ` (1 for a normalized state).
    pub fn trace(&self) -> f64 {
        self.rho[0][0].re + self.rho[1][1].re
    }

    /// Bloch vector from the Pauli expectation values:
    /// `x = 2·Re ρ01`, `y = −2·Im ρ01`, `z = ρ00 − ρ11`.
    pub fn bloch_vector(&self) -> BlochVector {
        let rho01 = self.rho[0][1];
        BlochVector {
            x: 2.0 * rho01.re,
            y: -2.0 * rho01.im,
            z: self.rho[0][0].re - self.rho[1][1].re,
        }
    }

    /// `Tr(ρ²)`: 1 for a pure qubit, 0.5 when maximally mixed.
    pub fn purity(&self) -> f64 {
        let mut sum = ZERO;
        for j in 0..2 {
            for k in 0..2 {
                sum += self.rho[j][k] * self.rho[k][j];
            }
        }
        sum.re
    }

    /// Eigenvalues, ascending, from the trace/determinant quadratic.
    pub fn eigenvalues(&self) -> [f64; 2] {
        let tr = self.trace();
        let det = (self.rho[0][0] * self.rho[1][1] - self.rho[0][1] * self.rho[1][0]).re;
        let disc = (tr * tr / 4.0 - det).max(0.0).sqrt();
        [tr / 2.0 - disc, tr / 2.0 + disc]
    }

    /// `−Σ λ log₂ λ`, skipping eigenvalues at or below `cutoff`.
    pub fn von_neumann_entropy(&self, cutoff: f64) -> f64 {
        entanglement::entropy_from_eigenvalues(&self.eigenvalues(), cutoff)
    }
}

/// Full `2^n × 2^n` density matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    matrix: Matrix,
    num_qubits: usize,
}

impl DensityMatrix {
    /// Outer product `|ψ⟩⟨ψ|`.
    pub fn from_state(state: &StateVector) -> Self {
        let amps = state.amplitudes();
        let n = amps.len();
        let matrix = Array2::from_shape_fn((n, n), |(i, j)| amps[i] * amps[j].conj());
        Self {
            matrix,
            num_qubits: state.num_qubits(),
        }
    }

    /// Validate and wrap an explicit matrix.
    ///
    /// The matrix must be square with a power-of-two dimension, Hermitian
    /// and of unit trace within `tolerance`.
    pub fn from_matrix(matrix: Matrix, tolerance: f64) -> StateResult<Self> {
        let n = linalg::ensure_square("density matrix", &matrix)?;
        if n < 2 || !n.is_power_of_two() {
            return Err(StateError::InvalidLength(n));
        }
        if !linalg::is_hermitian(&matrix, tolerance) {
            return Err(StateError::InvalidDensityMatrix("not Hermitian".into()));
        }
        let tr = linalg::trace(&matrix)?;
        if (tr.re - 1.0).abs() > tolerance || tr.im.abs() > tolerance {
            return Err(StateError::InvalidDensityMatrix(format!(
                "trace is {tr}, expected 1"
            )));
        }
        Ok(Self {
            matrix,
            num_qubits: n.trailing_zeros() as usize,
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension `2^n`.
    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Entry `ρ[i][j]`.
    pub fn element(&self, i: usize, j: usize) -> Complex64 {
        self.matrix[[i, j]]
    }

    /// `Tr ρ`.
    pub fn trace(&self) -> f64 {
        self.matrix.diag().iter().map(|z| z.re).sum()
    }

    /// `Tr(ρ²) = Σ |ρ_ij|²` for Hermitian ρ.
    pub fn purity(&self) -> f64 {
        self.matrix.iter().map(Complex64::norm_sqr).sum()
    }

    /// Zero non-finite entries, returning how many were replaced.
    pub fn sanitize(&mut self) -> usize {
        linalg::sanitize(&mut self.matrix)
    }

    /// Trace out every qubit except `qubit`.
    pub fn reduce_to_qubit(&self, qubit: usize) -> StateResult<ReducedDensityMatrix> {
        if qubit >= self.num_qubits {
            return Err(StateError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        let mask = 1 << qubit;
        let mut rho = [[ZERO; 2]; 2];
        for base in (0..self.dimension()).filter(|i| i & mask == 0) {
            for (j, row) in rho.iter_mut().enumerate() {
                for (k, entry) in row.iter_mut().enumerate() {
                    *entry += self.matrix[[base | (j * mask), base | (k * mask)]];
                }
            }
        }
        Ok(ReducedDensityMatrix::from_elements(rho))
    }

    /// Eigenvalues, ascending.
    pub fn eigenvalues(&self, max_sweeps: usize, tolerance: f64) -> StateResult<Vec<f64>> {
        Ok(linalg::hermitian_eigenvalues(
            &self.matrix,
            max_sweeps,
            tolerance,
        )?)
    }

    /// Von Neumann entropy `−Σ λ log₂ λ` over eigenvalues above `cutoff`.
    pub fn von_neumann_entropy(
        &self,
        cutoff: f64,
        max_sweeps: usize,
        tolerance: f64,
    ) -> StateResult<f64> {
        let values = self.eigenvalues(max_sweeps, tolerance)?;
        Ok(entanglement::entropy_from_eigenvalues(&values, cutoff))
    }
}
