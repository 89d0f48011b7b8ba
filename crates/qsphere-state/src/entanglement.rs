//! Entanglement measures: von Neumann entropy, concurrence and the
//! threshold witness built on it.

use num_complex::Complex64;
use tracing::trace;

use qsphere_gates::complex::ZERO;
use qsphere_gates::linalg::{self, Matrix};

use crate::density::{DensityMatrix, ReducedDensityMatrix};
use crate::error::{StateError, StateResult};

/// Eigenvalues at or below this contribute nothing to the entropy.
pub const ENTROPY_CUTOFF: f64 = 1e-10;

/// Concurrence above which a qubit is reported as entangled.
pub const DEFAULT_ENTANGLEMENT_THRESHOLD: f64 = 0.01;

/// `−Σ λ log₂ λ` over the eigenvalues above `cutoff`.
pub fn entropy_from_eigenvalues(values: &[f64], cutoff: f64) -> f64 {
    let s: f64 = values
        .iter()
        .filter(|&&lambda| lambda > cutoff)
        .map(|&lambda| -lambda * lambda.log2())
        .sum();
    s.max(0.0)
}

/// Wootters concurrence of a two-qubit density matrix.
///
/// `C = max(0, λ₁ − λ₂ − λ₃ − λ₄)`, where `λᵢ` are the square roots of the
/// eigenvalues of `√ρ ρ̃ √ρ` in decreasing order and `ρ̃ = (Y⊗Y) ρ* (Y⊗Y)`.
pub fn concurrence(rho: &DensityMatrix, max_sweeps: usize, tolerance: f64) -> StateResult<f64> {
    if rho.num_qubits() != 2 {
        return Err(StateError::NotTwoQubit(rho.num_qubits()));
    }
    let m = rho.matrix();

    let sqrt_rho = linalg::hermitian_function(m, |l| l.max(0.0).sqrt(), max_sweeps, tolerance)?;
    let yy = pauli_yy();
    let spin_flipped = linalg::matmul(&linalg::matmul(&yy, &m.mapv(|z| z.conj()))?, &yy)?;
    let r = linalg::matmul(&linalg::matmul(&sqrt_rho, &spin_flipped)?, &sqrt_rho)?;
    let r = (&r + &linalg::dagger(&r)).mapv(|z| z * 0.5);

    let mut lambdas: Vec<f64> = linalg::hermitian_eigenvalues(&r, max_sweeps, tolerance)?
        .into_iter()
        .map(|mu| mu.max(0.0).sqrt())
        .collect();
    lambdas.sort_by(|a, b| b.total_cmp(a));
    trace!(?lambdas, "wootters spectrum");

    let c = lambdas[0] - lambdas[1] - lambdas[2] - lambdas[3];
    Ok(c.clamp(0.0, 1.0))
}

/// Concurrence between one qubit and the rest of a pure register:
/// `√(2(1 − Tr ρ²))`, clamped to `[0, 1]`.
pub fn qubit_concurrence(rho: &ReducedDensityMatrix) -> f64 {
    (2.0 * (1.0 - rho.purity())).max(0.0).sqrt().min(1.0)
}

/// `threshold − concurrence`; negative means entanglement was detected.
pub fn witness_value(concurrence: f64, threshold: f64) -> f64 {
    threshold - concurrence
}

/// Entanglement flag for a witness value.
pub fn is_entangled(witness: f64) -> bool {
    witness < 0.0
}

fn pauli_yy() -> Matrix {
    let one = Complex64::new(1.0, 0.0);
    linalg::from_rows([
        [ZERO, ZERO, ZERO, -one],
        [ZERO, ZERO, one, ZERO],
        [ZERO, one, ZERO, ZERO],
        [-one, ZERO, ZERO, ZERO],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statevector::StateVector;
    use ndarray::Array2;

    const SWEEPS: usize = 64;
    const TOL: f64 = 1e-12;

    fn bell() -> StateVector {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_named("h", &[0], &[]).unwrap();
        sv.apply_named("cx", &[0, 1], &[]).unwrap();
        sv
    }

    /// `p |Φ+⟩⟨Φ+| + (1 − p) I/4`
    fn werner(p: f64) -> DensityMatrix {
        let pure = DensityMatrix::from_state(&bell());
        let mixed = Array2::from_shape_fn((4, 4), |(i, j)| {
            let noise = if i == j { (1.0 - p) / 4.0 } else { 0.0 };
            pure.element(i, j) * p + Complex64::new(noise, 0.0)
        });
        DensityMatrix::from_matrix(mixed, 1e-9).unwrap()
    }

    #[test]
    fn test_entropy_of_known_spectra() {
        assert_eq!(entropy_from_eigenvalues(&[1.0, 0.0], ENTROPY_CUTOFF), 0.0);
        assert!((entropy_from_eigenvalues(&[0.5, 0.5], ENTROPY_CUTOFF) - 1.0).abs() < 1e-12);
        assert!((entropy_from_eigenvalues(&[0.25; 4], ENTROPY_CUTOFF) - 2.0).abs() < 1e-12);
        // Tiny negative noise is skipped, not fed to log2.
        assert_eq!(entropy_from_eigenvalues(&[1.0, -1e-17], ENTROPY_CUTOFF), 0.0);
    }

    #[test]
    fn test_bell_concurrence_is_one() {
        let rho = DensityMatrix::from_state(&bell());
        let c = concurrence(&rho, SWEEPS, TOL).unwrap();
        assert!((c - 1.0).abs() < 1e-8, "got {c}");
    }

    #[test]
    fn test_product_state_concurrence_is_zero() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_named("ry", &[0], &[0.9]).unwrap();
        sv.apply_named("h", &[1], &[]).unwrap();
        let rho = DensityMatrix::from_state(&sv);
        let c = concurrence(&rho, SWEEPS, TOL).unwrap();
        assert!(c.abs() < 1e-6, "got {c}");
    }

    #[test]
    fn test_partially_entangled_concurrence() {
        // cos(θ/2)|00⟩ + sin(θ/2)|11⟩ has C = sin θ.
        let theta = 0.8_f64;
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_named("ry", &[0], &[theta]).unwrap();
        sv.apply_named("cx", &[0, 1], &[]).unwrap();
        let rho = DensityMatrix::from_state(&sv);
        let c = concurrence(&rho, SWEEPS, TOL).unwrap();
        assert!((c - theta.sin()).abs() < 1e-6, "got {c}");

        let reduced = sv.reduced_density_matrix(0).unwrap();
        assert!((qubit_concurrence(&reduced) - theta.sin()).abs() < 1e-10);
    }

    #[test]
    fn test_werner_state_concurrence() {
        for p in [0.2, 0.5, 0.8, 1.0] {
            let c = concurrence(&werner(p), SWEEPS, TOL).unwrap();
            let expected = ((3.0 * p - 1.0) / 2.0).max(0.0);
            assert!((c - expected).abs() < 1e-6, "p={p}: got {c}, expected {expected}");
        }
    }

    #[test]
    fn test_concurrence_requires_two_qubits() {
        let sv = StateVector::new(3).unwrap();
        let rho = DensityMatrix::from_state(&sv);
        assert!(matches!(
            concurrence(&rho, SWEEPS, TOL),
            Err(StateError::NotTwoQubit(3))
        ));
    }

    #[test]
    fn test_witness_and_flag() {
        let w = witness_value(1.0, DEFAULT_ENTANGLEMENT_THRESHOLD);
        assert!(w < 0.0);
        assert!(is_entangled(w));

        let w = witness_value(0.0, DEFAULT_ENTANGLEMENT_THRESHOLD);
        assert!((w - 0.01).abs() < 1e-15);
        assert!(!is_entangled(w));
    }
}
