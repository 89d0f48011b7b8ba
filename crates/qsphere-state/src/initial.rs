//! Initial-state presets for qubit 0.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qsphere_gates::GateKind;

use crate::error::StateError;

/// How qubit 0 is prepared before the circuit runs.
///
/// All other qubits start in |0⟩. The six presets are reached from |0⟩ with
/// the shortest sequence of fixed gates (see [`InitialState::preparation`]);
/// `Custom` writes a normalized `α|0⟩ + β|1⟩` directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialState {
    /// |0⟩
    #[default]
    Zero,
    /// |1⟩
    One,
    /// |+⟩ = (|0⟩ + |1⟩)/√2
    Plus,
    /// |−⟩ = (|0⟩ − |1⟩)/√2
    Minus,
    /// |+i⟩ = (|0⟩ + i|1⟩)/√2
    PlusI,
    /// |−i⟩ = (|0⟩ − i|1⟩)/√2
    MinusI,
    /// α|0⟩ + β|1⟩, normalized on use.
    Custom {
        /// Amplitude of |0⟩.
        alpha: Complex64,
        /// Amplitude of |1⟩.
        beta: Complex64,
    },
}

impl InitialState {
    /// The six fixed presets.
    pub const PRESETS: [InitialState; 6] = [
        InitialState::Zero,
        InitialState::One,
        InitialState::Plus,
        InitialState::Minus,
        InitialState::PlusI,
        InitialState::MinusI,
    ];

    /// Custom amplitude pair.
    pub fn custom(alpha: Complex64, beta: Complex64) -> Self {
        InitialState::Custom { alpha, beta }
    }

    /// Gates applied to |0⟩ (in order) to reach the preset. Empty for
    /// `Zero` and `Custom`.
    pub fn preparation(&self) -> &'static [GateKind] {
        match self {
            InitialState::Zero | InitialState::Custom { .. } => &[],
            InitialState::One => &[GateKind::X],
            InitialState::Plus => &[GateKind::H],
            InitialState::Minus => &[GateKind::X, GateKind::H],
            InitialState::PlusI => &[GateKind::H, GateKind::S],
            InitialState::MinusI => &[GateKind::X, GateKind::H, GateKind::S],
        }
    }

    /// Ket label, e.g. `|+i⟩`.
    pub fn label(&self) -> String {
        match self {
            InitialState::Zero => "|0⟩".into(),
            InitialState::One => "|1⟩".into(),
            InitialState::Plus => "|+⟩".into(),
            InitialState::Minus => "|−⟩".into(),
            InitialState::PlusI => "|+i⟩".into(),
            InitialState::MinusI => "|−i⟩".into(),
            InitialState::Custom { alpha, beta } => format!("({alpha})|0⟩ + ({beta})|1⟩"),
        }
    }
}

impl fmt::Display for InitialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for InitialState {
    type Err = StateError;

    /// Parse a preset from `0`, `|0>`, `zero`, `+`, `plus`, `-i`, `minus_i`, …
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .trim_start_matches('|')
            .trim_end_matches(['>', '⟩'])
            .replace('−', "-")
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '_' && *c != ' ')
            .collect();

        match normalized.as_str() {
            "0" | "zero" => Ok(InitialState::Zero),
            "1" | "one" => Ok(InitialState::One),
            "+" | "plus" => Ok(InitialState::Plus),
            "-" | "minus" => Ok(InitialState::Minus),
            "+i" | "i" | "plusi" => Ok(InitialState::PlusI),
            "-i" | "minusi" => Ok(InitialState::MinusI),
            _ => Err(StateError::UnknownInitialState(s.to_string())),
        }
    }
}
