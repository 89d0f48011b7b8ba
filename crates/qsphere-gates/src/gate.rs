//! Gate catalogue.
//!
//! Every gate is a named unitary of dimension `2^k` (k = 1 or 2). Two-qubit
//! matrices act on the basis ordering `|first, second⟩` with the first
//! operand (the control, where there is one) as the most significant bit.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::complex::{I, ONE, ZERO};
use crate::error::{GateError, GateResult};
use crate::linalg::{Matrix, from_rows};

/// Angle used when a rotation gate is requested without a parameter.
pub const DEFAULT_ANGLE: f64 = FRAC_PI_2;

/// Gates known to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl GateKind {
    /// Every gate in catalogue order.
    pub const ALL: [GateKind; 18] = [
        GateKind::I,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::SX,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::P,
        GateKind::CX,
        GateKind::CY,
        GateKind::CZ,
        GateKind::Swap,
    ];

    /// Look up a gate by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> GateResult<Self> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "i" | "id" | "identity" => GateKind::I,
            "x" | "pauli_x" | "not" => GateKind::X,
            "y" | "pauli_y" => GateKind::Y,
            "z" | "pauli_z" => GateKind::Z,
            "h" | "hadamard" => GateKind::H,
            "s" => GateKind::S,
            "sdg" | "sdag" | "s_dagger" => GateKind::Sdg,
            "t" => GateKind::T,
            "tdg" | "tdag" | "t_dagger" => GateKind::Tdg,
            "sx" | "sqrt_x" => GateKind::SX,
            "rx" => GateKind::Rx,
            "ry" => GateKind::Ry,
            "rz" => GateKind::Rz,
            "p" | "phase" => GateKind::P,
            "cx" | "cnot" => GateKind::CX,
            "cy" => GateKind::CY,
            "cz" => GateKind::CZ,
            "swap" => GateKind::Swap,
            _ => {
                return Err(GateError::UnknownGate {
                    name: name.to_string(),
                });
            }
        };
        Ok(kind)
    }

    /// Get the canonical name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::I => "i",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::H => "h",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::SX => "sx",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::P => "p",
            GateKind::CX => "cx",
            GateKind::CY => "cy",
            GateKind::CZ => "cz",
            GateKind::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::CX | GateKind::CY | GateKind::CZ | GateKind::Swap => 2,
            _ => 1,
        }
    }

    /// Number of angle parameters the gate accepts.
    #[inline]
    pub fn num_parameters(&self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::P => 1,
            _ => 0,
        }
    }

    /// One-line human description.
    pub fn description(&self) -> &'static str {
        match self {
            GateKind::I => "identity",
            GateKind::X => "Pauli-X (bit flip)",
            GateKind::Y => "Pauli-Y",
            GateKind::Z => "Pauli-Z (phase flip)",
            GateKind::H => "Hadamard",
            GateKind::S => "S phase (sqrt Z)",
            GateKind::Sdg => "S-dagger",
            GateKind::T => "T phase (fourth root of Z)",
            GateKind::Tdg => "T-dagger",
            GateKind::SX => "sqrt(X)",
            GateKind::Rx => "rotation about X",
            GateKind::Ry => "rotation about Y",
            GateKind::Rz => "rotation about Z",
            GateKind::P => "phase shift",
            GateKind::CX => "controlled-NOT",
            GateKind::CY => "controlled-Y",
            GateKind::CZ => "controlled-Z",
            GateKind::Swap => "SWAP",
        }
    }

    /// Build the unitary for this gate.
    ///
    /// Parameterized gates fall back to [`DEFAULT_ANGLE`] when `params` is
    /// empty. Supplying more parameters than the gate takes is an error.
    pub fn matrix(&self, params: &[f64]) -> GateResult<Matrix> {
        let arity = self.num_parameters();
        if params.len() > arity {
            return Err(GateError::ParameterCount {
                gate: self.name(),
                expected: arity,
                got: params.len(),
            });
        }
        if let Some(&value) = params.iter().find(|p| !p.is_finite()) {
            return Err(GateError::InvalidParameter {
                gate: self.name(),
                value,
            });
        }
        let theta = params.first().copied().unwrap_or(DEFAULT_ANGLE);

        let m = match self {
            GateKind::I => from_rows([[ONE, ZERO], [ZERO, ONE]]),
            GateKind::X => from_rows([[ZERO, ONE], [ONE, ZERO]]),
            GateKind::Y => from_rows([[ZERO, -I], [I, ZERO]]),
            GateKind::Z => from_rows([[ONE, ZERO], [ZERO, -ONE]]),
            GateKind::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                from_rows([[h, h], [h, -h]])
            }
            GateKind::S => diagonal(ONE, I),
            GateKind::Sdg => diagonal(ONE, -I),
            GateKind::T => diagonal(ONE, Complex64::from_polar(1.0, FRAC_PI_4)),
            GateKind::Tdg => diagonal(ONE, Complex64::from_polar(1.0, -FRAC_PI_4)),
            GateKind::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                from_rows([[a, b], [b, a]])
            }
            GateKind::Rx => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                from_rows([[c, s], [s, c]])
            }
            GateKind::Ry => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                from_rows([[c, -s], [s, c]])
            }
            GateKind::Rz => diagonal(
                Complex64::from_polar(1.0, -theta / 2.0),
                Complex64::from_polar(1.0, theta / 2.0),
            ),
            GateKind::P => diagonal(ONE, Complex64::from_polar(1.0, theta)),
            GateKind::CX => from_rows([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO],
            ]),
            GateKind::CY => from_rows([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, -I],
                [ZERO, ZERO, I, ZERO],
            ]),
            GateKind::CZ => from_rows([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ZERO, ZERO, -ONE],
            ]),
            GateKind::Swap => from_rows([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
            ]),
        };
        Ok(m)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GateKind {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

fn diagonal(a: Complex64, b: Complex64) -> Matrix {
    from_rows([[a, ZERO], [ZERO, b]])
}

/// A concrete gate: catalogue entry, resolved parameters and its matrix.
///
/// Gates are plain values; applying the same gate to the same qubits of the
/// same state always yields the same successor state.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    kind: GateKind,
    params: Vec<f64>,
    matrix: Matrix,
}

impl Gate {
    /// Build a gate from a catalogue entry and its parameters.
    pub fn new(kind: GateKind, params: &[f64]) -> GateResult<Self> {
        let matrix = kind.matrix(params)?;
        let params = if kind.num_parameters() > 0 && params.is_empty() {
            vec![DEFAULT_ANGLE]
        } else {
            params.to_vec()
        };
        Ok(Self {
            kind,
            params,
            matrix,
        })
    }

    /// Look up `name` (case-insensitive) and build the gate.
    pub fn from_name(name: &str, params: &[f64]) -> GateResult<Self> {
        Self::new(GateKind::from_name(name)?, params)
    }

    /// Canonical gate name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Catalogue entry.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Resolved parameters (defaults filled in).
    pub fn parameters(&self) -> &[f64] {
        &self.params
    }

    /// The unitary matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        self.kind.num_qubits()
    }

    /// Matrix dimension, `2^num_qubits`.
    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.name())
        } else {
            let params: Vec<String> = self.params.iter().map(|p| format!("{p:.4}")).collect();
            write!(f, "{}({})", self.name(), params.join(", "))
        }
    }
}

/// True if `name` is a known single-qubit gate.
pub fn is_single_qubit(name: &str) -> bool {
    GateKind::from_name(name).is_ok_and(|k| k.num_qubits() == 1)
}

/// True if `name` is a known two-qubit gate.
pub fn is_two_qubit(name: &str) -> bool {
    GateKind::from_name(name).is_ok_and(|k| k.num_qubits() == 2)
}

/// Number of target qubits `name` requires.
pub fn required_qubits(name: &str) -> GateResult<usize> {
    GateKind::from_name(name).map(|k| k.num_qubits())
}

/// All catalogue entries, in display order.
pub fn catalogue() -> impl Iterator<Item = GateKind> {
    GateKind::ALL.into_iter()
}
