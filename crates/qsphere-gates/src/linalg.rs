//! Dense complex linear algebra.
//!
//! Matrices are `ndarray::Array2<Complex64>`. Every helper validates operand
//! shapes before touching data and reports problems as [`LinalgError`]; no
//! helper ever substitutes a placeholder matrix for malformed input.
//!
//! The Hermitian eigensolver uses cyclic complex Jacobi rotations. Each
//! rotation first removes the phase of the pivot element with a diagonal
//! unitary, then applies the classical real Jacobi rotation, so the
//! accumulated transform stays unitary and eigenvectors come for free.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::trace;

use crate::complex::{ComplexExt, ZERO};
use crate::error::{LinalgError, LinalgResult};

/// Tolerance used when checking Hermiticity of eigensolver input.
const HERMITIAN_CHECK_TOLERANCE: f64 = 1e-8;

/// Dense complex matrix.
pub type Matrix = Array2<Complex64>;

/// Return the dimension of a square matrix, or an error naming `op`.
pub fn ensure_square(op: &'static str, m: &Matrix) -> LinalgResult<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { op, rows, cols });
    }
    Ok(rows)
}

/// `n × n` identity.
pub fn identity(n: usize) -> Matrix {
    Array2::eye(n)
}

/// Matrix product `a · b`.
pub fn matmul(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    if a.ncols() != b.nrows() {
        return Err(LinalgError::ShapeMismatch {
            op: "matmul",
            left: a.dim(),
            right: b.dim(),
        });
    }
    Ok(a.dot(b))
}

/// Kronecker (tensor) product `a ⊗ b`.
pub fn kron(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    if ar == 0 || ac == 0 || br == 0 || bc == 0 {
        return Err(LinalgError::ShapeMismatch {
            op: "kron",
            left: a.dim(),
            right: b.dim(),
        });
    }

    let mut out = Array2::from_elem((ar * br, ac * bc), ZERO);
    for ((i, j), &x) in a.indexed_iter() {
        for ((k, l), &y) in b.indexed_iter() {
            out[[i * br + k, j * bc + l]] = x * y;
        }
    }
    Ok(out)
}

/// Conjugate transpose.
pub fn dagger(m: &Matrix) -> Matrix {
    m.t().mapv(|z| z.conj())
}

/// Sum of diagonal entries.
pub fn trace(m: &Matrix) -> LinalgResult<Complex64> {
    ensure_square("trace", m)?;
    Ok(m.diag().iter().sum())
}

/// Frobenius norm.
pub fn frobenius_norm(m: &Matrix) -> f64 {
    m.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
}

/// Check `m = m†` entry-wise within `tolerance`.
pub fn is_hermitian(m: &Matrix, tolerance: f64) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    for i in 0..rows {
        for j in i..cols {
            if !m[[i, j]].approx_eq(&m[[j, i]].conj(), tolerance) {
                return false;
            }
        }
    }
    true
}

/// Check `m† m = 1` entry-wise within `tolerance`.
pub fn is_unitary(m: &Matrix, tolerance: f64) -> bool {
    let Ok(n) = ensure_square("is_unitary", m) else {
        return false;
    };
    let product = dagger(m).dot(m);
    let eye = identity(n);
    product
        .iter()
        .zip(eye.iter())
        .all(|(a, b)| a.approx_eq(b, tolerance))
}

/// Replace NaN / infinite entries with zero, returning how many were replaced.
pub fn sanitize_values<'a>(values: impl IntoIterator<Item = &'a mut Complex64>) -> usize {
    let mut replaced = 0;
    for z in values {
        if !z.is_finite_value() {
            *z = ZERO;
            replaced += 1;
        }
    }
    replaced
}

/// Matrix form of [`sanitize_values`].
pub fn sanitize(m: &mut Matrix) -> usize {
    sanitize_values(m.iter_mut())
}

/// Eigenvalues of a 2×2 Hermitian matrix, ascending, from the trace and
/// determinant.
pub fn hermitian_eigenvalues_2x2(m: &Matrix) -> LinalgResult<[f64; 2]> {
    let n = ensure_square("hermitian_eigenvalues_2x2", m)?;
    if n != 2 {
        return Err(LinalgError::ShapeMismatch {
            op: "hermitian_eigenvalues_2x2",
            left: m.dim(),
            right: (2, 2),
        });
    }
    let tr = m[[0, 0]].re + m[[1, 1]].re;
    let det = (m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]]).re;
    let disc = (tr * tr / 4.0 - det).max(0.0).sqrt();
    Ok([tr / 2.0 - disc, tr / 2.0 + disc])
}

/// Full eigendecomposition of a Hermitian matrix.
///
/// Returns eigenvalues in ascending order and the matching unit
/// eigenvectors as the columns of a unitary matrix.
pub fn hermitian_eigen(
    m: &Matrix,
    max_sweeps: usize,
    tolerance: f64,
) -> LinalgResult<(Vec<f64>, Matrix)> {
    let n = ensure_square("hermitian_eigen", m)?;
    if !is_hermitian(m, HERMITIAN_CHECK_TOLERANCE) {
        return Err(LinalgError::NotHermitian {
            op: "hermitian_eigen",
        });
    }

    let mut a = m.clone();
    let mut v = identity(n);
    let threshold = tolerance * frobenius_norm(m).max(1.0);

    for sweep in 0..max_sweeps {
        let off = off_diagonal_norm(&a);
        if off <= threshold {
            trace!(sweep, off, "Jacobi converged");
            return Ok(sorted_eigenpairs(&a, v));
        }
        for p in 0..n {
            for q in (p + 1)..n {
                jacobi_rotate(&mut a, &mut v, p, q);
            }
        }
    }

    let residual = off_diagonal_norm(&a);
    if residual <= threshold {
        return Ok(sorted_eigenpairs(&a, v));
    }
    Err(LinalgError::NoConvergence {
        sweeps: max_sweeps,
        residual,
    })
}

/// Eigenvalues of a Hermitian matrix, ascending.
///
/// 1×1 and 2×2 inputs are solved in closed form; larger inputs go through
/// [`hermitian_eigen`].
pub fn hermitian_eigenvalues(
    m: &Matrix,
    max_sweeps: usize,
    tolerance: f64,
) -> LinalgResult<Vec<f64>> {
    match ensure_square("hermitian_eigenvalues", m)? {
        0 => Ok(Vec::new()),
        1 => Ok(vec![m[[0, 0]].re]),
        2 => {
            if !is_hermitian(m, HERMITIAN_CHECK_TOLERANCE) {
                return Err(LinalgError::NotHermitian {
                    op: "hermitian_eigenvalues",
                });
            }
            Ok(hermitian_eigenvalues_2x2(m)?.to_vec())
        }
        _ => Ok(hermitian_eigen(m, max_sweeps, tolerance)?.0),
    }
}

/// Apply a scalar function through the spectral decomposition:
/// `V · diag(f(λ)) · V†`.
pub fn hermitian_function(
    m: &Matrix,
    f: impl Fn(f64) -> f64,
    max_sweeps: usize,
    tolerance: f64,
) -> LinalgResult<Matrix> {
    let (values, vectors) = hermitian_eigen(m, max_sweeps, tolerance)?;
    let mut scaled = vectors.clone();
    for (k, &lambda) in values.iter().enumerate() {
        let fk = f(lambda);
        scaled.column_mut(k).mapv_inplace(|z| z * fk);
    }
    matmul(&scaled, &dagger(&vectors))
}

fn off_diagonal_norm(a: &Matrix) -> f64 {
    let mut sum = 0.0;
    for ((i, j), z) in a.indexed_iter() {
        if i != j {
            sum += z.norm_sqr();
        }
    }
    sum.sqrt()
}

/// One complex Jacobi rotation zeroing `a[p][q]` and `a[q][p]`.
fn jacobi_rotate(a: &mut Matrix, v: &mut Matrix, p: usize, q: usize) {
    let apq = a[[p, q]];
    let mag = apq.norm();
    if mag < f64::MIN_POSITIVE {
        return;
    }
    let phase = apq / mag;

    let app = a[[p, p]].re;
    let aqq = a[[q, q]].re;
    let theta = (aqq - app) / (2.0 * mag);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    // J = diag(1, conj(phase)) · [[c, s], [-s, c]] restricted to (p, q).
    let j_pp = Complex64::new(c, 0.0);
    let j_pq = Complex64::new(s, 0.0);
    let j_qp = phase.conj() * -s;
    let j_qq = phase.conj() * c;

    let n = a.nrows();

    // A ← A · J
    for k in 0..n {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = akp * j_pp + akq * j_qp;
        a[[k, q]] = akp * j_pq + akq * j_qq;
    }
    // A ← J† · A
    for k in 0..n {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = j_pp.conj() * apk + j_qp.conj() * aqk;
        a[[q, k]] = j_pq.conj() * apk + j_qq.conj() * aqk;
    }
    // V ← V · J
    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = vkp * j_pp + vkq * j_qp;
        v[[k, q]] = vkp * j_pq + vkq * j_qq;
    }

    a[[p, q]] = ZERO;
    a[[q, p]] = ZERO;
    a[[p, p]] = Complex64::new(a[[p, p]].re, 0.0);
    a[[q, q]] = Complex64::new(a[[q, q]].re, 0.0);
}

fn sorted_eigenpairs(a: &Matrix, v: Matrix) -> (Vec<f64>, Matrix) {
    let n = a.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[i, i]].re.total_cmp(&a[[j, j]].re));

    let values = order.iter().map(|&i| a[[i, i]].re).collect();
    let mut vectors = Array2::from_elem((n, n), ZERO);
    for (dst, &src) in order.iter().enumerate() {
        vectors.column_mut(dst).assign(&v.column(src));
    }
    (values, vectors)
}

/// Build a matrix from row-major rows. Used for the gate catalogue and tests.
pub fn from_rows<const N: usize>(rows: [[Complex64; N]; N]) -> Matrix {
    Array2::from_shape_fn((N, N), |(i, j)| rows[i][j])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::{I, ONE};
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_matmul_shape_mismatch() {
        let a = Array2::from_elem((2, 3), ONE);
        let b = Array2::from_elem((2, 2), ONE);
        let err = matmul(&a, &b).unwrap_err();
        assert!(matches!(err, LinalgError::ShapeMismatch { op: "matmul", .. }));
    }

    #[test]
    fn test_matmul_pauli_square_is_identity() {
        let y = array![[ZERO, -I], [I, ZERO]];
        let yy = matmul(&y, &y).unwrap();
        assert!(yy.iter().zip(identity(2).iter()).all(|(a, b)| a.approx_eq(b, 1e-12)));
    }

    #[test]
    fn test_kron_dimensions_and_entries() {
        let x = array![[ZERO, ONE], [ONE, ZERO]];
        let eye = identity(2);
        let k = kron(&x, &eye).unwrap();
        assert_eq!(k.dim(), (4, 4));
        assert!(k[[0, 2]].approx_eq(&ONE, 1e-12));
        assert!(k[[1, 3]].approx_eq(&ONE, 1e-12));
        assert!(k[[0, 0]].approx_eq(&ZERO, 1e-12));
    }

    #[test]
    fn test_kron_rejects_empty() {
        let empty: Matrix = Array2::from_elem((0, 0), ZERO);
        assert!(kron(&empty, &identity(2)).is_err());
    }

    #[test]
    fn test_trace_requires_square() {
        let m = Array2::from_elem((2, 3), ONE);
        assert!(matches!(
            trace(&m),
            Err(LinalgError::NotSquare { rows: 2, cols: 3, .. })
        ));
    }

    #[test]
    fn test_sanitize_counts_replacements() {
        let mut m = array![[c(f64::NAN, 0.0), ONE], [c(0.0, f64::INFINITY), ONE]];
        assert_eq!(sanitize(&mut m), 2);
        assert!(m[[0, 0]].approx_eq(&ZERO, 0.0));
        assert!(m[[1, 0]].approx_eq(&ZERO, 0.0));
        assert_eq!(sanitize(&mut m), 0);
    }

    #[test]
    fn test_eigenvalues_2x2_closed_form() {
        // Pauli-X has eigenvalues ±1.
        let x = array![[ZERO, ONE], [ONE, ZERO]];
        let ev = hermitian_eigenvalues_2x2(&x).unwrap();
        assert!((ev[0] + 1.0).abs() < 1e-12);
        assert!((ev[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_jacobi_diagonalizes_complex_hermitian() {
        let m = array![
            [c(2.0, 0.0), c(1.0, 1.0), c(0.0, 0.5)],
            [c(1.0, -1.0), c(3.0, 0.0), c(0.2, 0.0)],
            [c(0.0, -0.5), c(0.2, 0.0), c(1.0, 0.0)],
        ];
        let (values, vectors) = hermitian_eigen(&m, 64, 1e-12).unwrap();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(is_unitary(&vectors, 1e-9));

        // V · diag(λ) · V† reconstructs the input.
        let mut scaled = vectors.clone();
        for (k, &lambda) in values.iter().enumerate() {
            scaled.column_mut(k).mapv_inplace(|z| z * lambda);
        }
        let rebuilt = matmul(&scaled, &dagger(&vectors)).unwrap();
        assert!(rebuilt.iter().zip(m.iter()).all(|(a, b)| a.approx_eq(b, 1e-9)));

        let sum: f64 = values.iter().sum();
        assert!((sum - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_jacobi_rejects_non_hermitian() {
        let m = array![[ONE, ONE], [ZERO, ONE]];
        assert!(matches!(
            hermitian_eigen(&m, 16, 1e-12),
            Err(LinalgError::NotHermitian { .. })
        ));
    }

    #[test]
    fn test_hermitian_function_square_root() {
        let m = array![[c(2.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(2.0, 0.0)]];
        let root = hermitian_function(&m, f64::sqrt, 64, 1e-12).unwrap();
        let square = matmul(&root, &root).unwrap();
        assert!(square.iter().zip(m.iter()).all(|(a, b)| a.approx_eq(b, 1e-9)));
    }

    #[test]
    fn test_unitary_check() {
        let h = 1.0 / 2.0_f64.sqrt();
        let hadamard = array![[c(h, 0.0), c(h, 0.0)], [c(h, 0.0), c(-h, 0.0)]];
        assert!(is_unitary(&hadamard, 1e-12));
        let not_unitary = array![[ONE, ONE], [ZERO, ONE]];
        assert!(!is_unitary(&not_unitary, 1e-12));
    }
}
