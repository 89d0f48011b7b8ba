//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use qsphere_gates::complex::{ONE, ZERO};
use qsphere_gates::linalg::sanitize_values;
use qsphere_gates::{Gate, Matrix};

use crate::density::{BlochVector, ReducedDensityMatrix};
use crate::error::{StateError, StateResult};
use crate::initial::InitialState;

/// Largest register a statevector will allocate (2^30 amplitudes, 16 GiB).
pub const MAX_QUBITS: usize = 30;

/// Below this, a norm or probability is treated as zero.
const NORM_EPSILON: f64 = 1e-15;

/// Result of a single-qubit projective measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// Measured qubit.
    pub qubit: usize,
    /// Observed bit, 0 or 1.
    pub outcome: u8,
    /// Probability of that outcome before collapse.
    pub probability: f64,
}

/// A statevector representing a pure quantum state.
///
/// Amplitude `i` belongs to the basis state whose binary encoding is `i`,
/// with bit `q` of the index holding qubit `q`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> StateResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(StateError::InvalidQubitCount {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap an explicit amplitude vector, normalizing it.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> StateResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(StateError::InvalidLength(len));
        }
        let num_qubits = len.trailing_zeros() as usize;
        if num_qubits > MAX_QUBITS {
            return Err(StateError::InvalidQubitCount {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut sv = Self {
            amplitudes,
            num_qubits,
        };
        sv.normalize()?;
        Ok(sv)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, `2^num_qubits`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of one basis state.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Return to |0...0⟩.
    pub fn reset(&mut self) {
        self.amplitudes.fill(ZERO);
        self.amplitudes[0] = ONE;
    }

    /// Reset, then prepare qubit 0 in `initial`.
    pub fn initialize(&mut self, initial: &InitialState) -> StateResult<()> {
        self.reset();
        match initial {
            InitialState::Custom { alpha, beta } => {
                let norm = (alpha.norm_sqr() + beta.norm_sqr()).sqrt();
                if norm < NORM_EPSILON || !norm.is_finite() {
                    return Err(StateError::ZeroNorm);
                }
                self.amplitudes[0] = *alpha / norm;
                self.amplitudes[1] = *beta / norm;
            }
            preset => {
                for &kind in preset.preparation() {
                    let gate = Gate::new(kind, &[])?;
                    self.apply_gate(&gate, &[0])?;
                }
            }
        }
        Ok(())
    }

    /// Apply a gate to specific qubits.
    pub fn apply_gate(&mut self, gate: &Gate, targets: &[usize]) -> StateResult<()> {
        self.apply_matrix(gate.name(), gate.matrix(), targets)
    }

    /// Look up a gate by name and apply it.
    pub fn apply_named(&mut self, name: &str, targets: &[usize], params: &[f64]) -> StateResult<()> {
        let gate = Gate::from_name(name, params)?;
        self.apply_gate(&gate, targets)
    }

    /// Apply a `2^k × 2^k` matrix to `k` target qubits.
    ///
    /// Basis indices are grouped by every bit outside `targets`; within a
    /// group the `2^k` selected amplitudes form a local vector that is
    /// left-multiplied by `matrix`. `targets[0]` is the most significant
    /// bit of the local index, so two-qubit matrices read as
    /// `|targets[0], targets[1]⟩`.
    pub fn apply_matrix(&mut self, name: &str, matrix: &Matrix, targets: &[usize]) -> StateResult<()> {
        let k = targets.len();
        if k == 0 {
            return Err(StateError::NoTargets {
                gate: name.to_string(),
            });
        }
        let dim = 1usize << k;
        let (rows, cols) = matrix.dim();
        if rows != dim || cols != dim {
            return Err(StateError::DimensionMismatch {
                gate: name.to_string(),
                targets: k,
                expected: dim,
                got: rows.max(cols),
            });
        }
        self.check_targets(name, targets)?;

        // Offset of each local basis state within a group.
        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                targets.iter().enumerate().fold(0, |acc, (j, &q)| {
                    if (local >> (k - 1 - j)) & 1 == 1 {
                        acc | (1 << q)
                    } else {
                        acc
                    }
                })
            })
            .collect();
        let target_mask = offsets[dim - 1];

        let mut local = vec![ZERO; dim];
        for base in 0..self.amplitudes.len() {
            if base & target_mask != 0 {
                continue;
            }
            for (slot, &offset) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, &offset) in offsets.iter().enumerate() {
                let mut acc = ZERO;
                for (col, &amp) in local.iter().enumerate() {
                    acc += matrix[[row, col]] * amp;
                }
                self.amplitudes[base | offset] = acc;
            }
        }

        trace!(gate = name, ?targets, "applied gate");
        Ok(())
    }

    fn check_targets(&self, name: &str, targets: &[usize]) -> StateResult<()> {
        for (i, &q) in targets.iter().enumerate() {
            if q >= self.num_qubits {
                return Err(StateError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
            if targets[..i].contains(&q) {
                return Err(StateError::DuplicateQubit {
                    qubit: q,
                    gate: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: usize) -> StateResult<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Σ |amplitude|².
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// True if the total probability is 1 within `tolerance`.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() <= tolerance
    }

    /// Rescale to unit norm.
    pub fn normalize(&mut self) -> StateResult<()> {
        let norm = self.norm_sqr().sqrt();
        if norm < NORM_EPSILON || !norm.is_finite() {
            return Err(StateError::ZeroNorm);
        }
        for amp in &mut self.amplitudes {
            *amp /= norm;
        }
        Ok(())
    }

    /// Zero any NaN / infinite amplitude, returning how many were replaced.
    pub fn sanitize(&mut self) -> usize {
        sanitize_values(self.amplitudes.iter_mut())
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Marginal probability that `qubit` reads 1.
    pub fn probability_of_one(&self, qubit: usize) -> StateResult<f64> {
        self.check_qubit(qubit)?;
        let mask = 1 << qubit;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Measure `qubit` in the computational basis, collapsing the state.
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        qubit: usize,
        rng: &mut R,
    ) -> StateResult<MeasurementOutcome> {
        let r: f64 = rng.r#gen();
        self.measure_with(qubit, r)
    }

    /// Measure with an externally supplied uniform sample `r ∈ [0, 1)`.
    ///
    /// The outcome is 1 when `r ≥ P(0)`. A branch whose amplitudes are all
    /// exactly zero is never selected, however small the other branch is.
    /// Amplitudes inconsistent with the outcome are zeroed and the survivors
    /// renormalized.
    pub fn measure_with(&mut self, qubit: usize, r: f64) -> StateResult<MeasurementOutcome> {
        self.check_qubit(qubit)?;
        let mask = 1 << qubit;
        let (p0, p1) = self
            .amplitudes
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(p0, p1), (i, a)| {
                if i & mask == 0 {
                    (p0 + a.norm_sqr(), p1)
                } else {
                    (p0, p1 + a.norm_sqr())
                }
            });

        let outcome: u8 = match (p0 > 0.0, p1 > 0.0) {
            (false, false) => return Err(StateError::ZeroNorm),
            (true, false) => 0,
            (false, true) => 1,
            (true, true) => u8::from(r >= p0),
        };
        let probability = if outcome == 1 { p1 } else { p0 };

        let keep = if outcome == 1 { mask } else { 0 };
        let scale = 1.0 / probability.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == keep {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }

        trace!(qubit, outcome, probability, "measured");
        Ok(MeasurementOutcome {
            qubit,
            outcome,
            probability,
        })
    }

    /// Sample a full-register measurement outcome without collapsing.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();
        self.sample_with(r)
    }

    /// Sample with an externally supplied uniform `r ∈ [0, 1)`.
    ///
    /// Only basis states with a nonzero amplitude are ever returned.
    pub fn sample_with(&self, r: f64) -> usize {
        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            cumulative += p;
            if p > 0.0 && r < cumulative {
                return i;
            }
        }

        // Rounding left the cumulative sum just under r.
        self.amplitudes
            .iter()
            .rposition(|a| a.norm_sqr() > 0.0)
            .unwrap_or(self.amplitudes.len() - 1)
    }

    /// Convert measurement outcome to bitstring (qubit 0 leftmost).
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
            .chars()
            .rev()
            .collect()
    }

    /// Reduced 2×2 density matrix of one qubit.
    pub fn reduced_density_matrix(&self, qubit: usize) -> StateResult<ReducedDensityMatrix> {
        ReducedDensityMatrix::from_state(self, qubit)
    }

    /// Bloch vector of one qubit.
    pub fn bloch_vector(&self, qubit: usize) -> StateResult<BlochVector> {
        Ok(self.reduced_density_matrix(qubit)?.bloch_vector())
    }

    /// Purity `Tr(ρ²)` of one qubit's reduced state.
    pub fn purity(&self, qubit: usize) -> StateResult<f64> {
        Ok(self.reduced_density_matrix(qubit)?.purity())
    }
}
