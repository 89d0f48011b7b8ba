//! Simulation results.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qsphere_state::BlochVector;

/// Diagnostics for one qubit of the final state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QubitResult {
    /// Qubit index.
    pub qubit_index: usize,
    /// Bloch vector of the reduced state.
    pub bloch_vector: BlochVector,
    /// `Tr(ρ²)` of the reduced state.
    pub purity: f64,
    /// Bloch vector length, clamped to 1.
    pub reduced_radius: f64,
    /// Whether the witness detected entanglement.
    pub is_entangled: bool,
    /// Wootters concurrence in `[0, 1]`. Zero unless the register has
    /// exactly two qubits.
    pub concurrence: f64,
    /// Entropy of the full density matrix, in bits.
    pub von_neumann_entropy: f64,
    /// `threshold − concurrence`; negative when entangled.
    pub witness_value: f64,
    /// Concurrence between this qubit and the rest, `sqrt(2(1 − Tr ρ²))`.
    #[serde(default)]
    pub rest_concurrence: f64,
    /// Entropy of this qubit's reduced state, in bits.
    #[serde(default)]
    pub reduced_entropy: f64,
    /// Raw amplitudes, serialised as `[re, im]` pairs. Qubit 0 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statevector: Option<Vec<Complex64>>,
}

/// Outcome of one circuit execution.
///
/// Either every qubit has a [`QubitResult`] and `success` is true, or the
/// list is empty and `error` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// True if every gate was applied and analysed.
    pub success: bool,
    /// One entry per qubit, in index order. Empty on failure.
    #[serde(default)]
    pub qubit_results: Vec<QubitResult>,
    /// Wall-clock time in milliseconds (up to the failure, if any).
    pub execution_time: f64,
    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-finite values replaced by zero during the run.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub numeric_clamps: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl SimulationResult {
    /// A successful run.
    pub fn completed(qubit_results: Vec<QubitResult>) -> Self {
        Self {
            success: true,
            qubit_results,
            execution_time: 0.0,
            error: None,
            numeric_clamps: 0,
        }
    }

    /// A failed run with no per-qubit data.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            qubit_results: Vec::new(),
            execution_time: 0.0,
            error: Some(error.into()),
            numeric_clamps: 0,
        }
    }

    /// Set execution time in milliseconds.
    pub fn with_execution_time(mut self, ms: f64) -> Self {
        self.execution_time = ms;
        self
    }

    /// Set the numeric clamp counter.
    pub fn with_numeric_clamps(mut self, count: usize) -> Self {
        self.numeric_clamps = count;
        self
    }

    /// Diagnostics for one qubit.
    pub fn qubit(&self, index: usize) -> Option<&QubitResult> {
        self.qubit_results.get(index)
    }

    /// Qubit 0's amplitude readout, if present.
    pub fn statevector(&self) -> Option<&[Complex64]> {
        self.qubit_results
            .first()
            .and_then(|q| q.statevector.as_deref())
    }

    /// Indices of the qubits flagged as entangled.
    pub fn entangled_qubits(&self) -> Vec<usize> {
        self.qubit_results
            .iter()
            .filter(|q| q.is_entangled)
            .map(|q| q.qubit_index)
            .collect()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_qubit(index: usize, amps: bool) -> QubitResult {
        QubitResult {
            qubit_index: index,
            bloch_vector: BlochVector::new(0.0, 0.0, 1.0),
            purity: 1.0,
            reduced_radius: 1.0,
            is_entangled: false,
            concurrence: 0.0,
            von_neumann_entropy: 0.0,
            witness_value: 0.01,
            rest_concurrence: 0.0,
            reduced_entropy: 0.0,
            statevector: amps.then(|| vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]),
        }
    }

    #[test]
    fn test_success_serialization() {
        let result = SimulationResult::completed(vec![sample_qubit(0, true), sample_qubit(1, false)])
            .with_execution_time(1.25);
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["executionTime"], 1.25);
        assert!(value.get("error").is_none());
        assert!(value.get("numericClamps").is_none());

        let q0 = &value["qubitResults"][0];
        assert_eq!(q0["qubitIndex"], 0);
        assert_eq!(q0["blochVector"]["z"], 1.0);
        assert_eq!(q0["reducedRadius"], 1.0);
        assert_eq!(q0["statevector"][0][0], 1.0);
        assert_eq!(q0["statevector"][1][1], 0.0);
        assert!(value["qubitResults"][1].get("statevector").is_none());
    }

    #[test]
    fn test_failure_serialization() {
        let result = SimulationResult::failed("Unknown gate: 'warp'")
            .with_execution_time(0.5)
            .with_numeric_clamps(2);
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["qubitResults"].as_array().unwrap().len(), 0);
        assert_eq!(value["error"], "Unknown gate: 'warp'");
        assert_eq!(value["numericClamps"], 2);
    }

    #[test]
    fn test_accessors() {
        let mut q1 = sample_qubit(1, false);
        q1.is_entangled = true;
        let result = SimulationResult::completed(vec![sample_qubit(0, true), q1]);
        assert_eq!(result.statevector().map(<[Complex64]>::len), Some(2));
        assert_eq!(result.entangled_qubits(), vec![1]);
        assert!(result.qubit(2).is_none());
    }
}
