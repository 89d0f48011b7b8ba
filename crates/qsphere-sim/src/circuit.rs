//! Circuit descriptions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// One gate application: a gate name, its operands and optional angles.
///
/// For two-qubit gates the first operand is the control (or first input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOp {
    /// Gate name, matched case-insensitively.
    pub name: String,
    /// Target qubit indices.
    pub qubits: Vec<usize>,
    /// Gate parameters (rotation angles in radians).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<f64>,
}

impl GateOp {
    /// Create a gate application.
    pub fn new(name: impl Into<String>, qubits: Vec<usize>, parameters: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            qubits,
            parameters,
        }
    }
}

/// A qubit count plus an ordered gate list. Carries no simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    /// Register size.
    pub num_qubits: usize,
    /// Gates, applied in order.
    #[serde(default)]
    pub gates: Vec<GateOp>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Append a gate application.
    pub fn gate(&mut self, name: &str, qubits: &[usize], parameters: &[f64]) -> &mut Self {
        self.gates
            .push(GateOp::new(name, qubits.to_vec(), parameters.to_vec()));
        self
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, q: usize) -> &mut Self {
        self.gate("h", &[q], &[])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, q: usize) -> &mut Self {
        self.gate("x", &[q], &[])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, q: usize) -> &mut Self {
        self.gate("y", &[q], &[])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, q: usize) -> &mut Self {
        self.gate("z", &[q], &[])
    }

    /// Apply S gate.
    pub fn s(&mut self, q: usize) -> &mut Self {
        self.gate("s", &[q], &[])
    }

    /// Apply T gate.
    pub fn t(&mut self, q: usize) -> &mut Self {
        self.gate("t", &[q], &[])
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, q: usize) -> &mut Self {
        self.gate("rx", &[q], &[theta])
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, q: usize) -> &mut Self {
        self.gate("ry", &[q], &[theta])
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, q: usize) -> &mut Self {
        self.gate("rz", &[q], &[theta])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.gate("cx", &[control, target], &[])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        self.gate("cz", &[control, target], &[])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: usize, q2: usize) -> &mut Self {
        self.gate("swap", &[q1, q2], &[])
    }

    /// Create a Bell state circuit.
    pub fn bell() -> Self {
        let mut circuit = Self::new(2);
        circuit.h(0).cx(0, 1);
        circuit
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: usize) -> Self {
        let mut circuit = Self::new(n);
        if n == 0 {
            return circuit;
        }
        circuit.h(0);
        for i in 0..n - 1 {
            circuit.cx(i, i + 1);
        }
        circuit
    }

    /// Number of gate applications.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Check register size and operand indices.
    ///
    /// Gate names and arities are resolved at execution time.
    pub fn validate(&self, max_qubits: usize) -> SimResult<()> {
        if self.num_qubits == 0 {
            return Err(SimError::InvalidCircuit(
                "circuit must have at least one qubit".into(),
            ));
        }
        if self.num_qubits > max_qubits {
            return Err(SimError::InvalidCircuit(format!(
                "circuit has {} qubits but at most {max_qubits} are supported",
                self.num_qubits
            )));
        }
        for (i, op) in self.gates.iter().enumerate() {
            if op.qubits.is_empty() {
                return Err(SimError::InvalidCircuit(format!(
                    "gate {i} ('{}') has no target qubits",
                    op.name
                )));
            }
            if let Some(&q) = op.qubits.iter().find(|&&q| q >= self.num_qubits) {
                return Err(SimError::InvalidCircuit(format!(
                    "gate {i} ('{}') targets qubit {q} in a {}-qubit circuit",
                    op.name, self.num_qubits
                )));
            }
        }
        Ok(())
    }

    /// Parse from JSON.
    pub fn from_json(text: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse from YAML.
    pub fn from_yaml(text: &str) -> SimResult<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Load from a file, choosing the format by extension (`.json`, else YAML).
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
