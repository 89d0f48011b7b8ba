//! Simulator configuration.
//!
//! Loaded from (highest precedence first):
//! 1. Environment variables with the `QSPHERE_` prefix
//! 2. A YAML or JSON configuration file
//! 3. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qsphere_state::{DEFAULT_ENTANGLEMENT_THRESHOLD, ENTROPY_CUTOFF, MAX_QUBITS};

use crate::circuit::is_json;
use crate::error::{SimError, SimResult};

/// Tunables for one [`Simulator`](crate::Simulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Largest register accepted by `run`.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Concurrence above which a qubit is flagged as entangled.
    #[serde(default = "default_entanglement_threshold")]
    pub entanglement_threshold: f64,

    /// Eigenvalues at or below this are skipped in entropy sums.
    #[serde(default = "default_entropy_cutoff")]
    pub entropy_cutoff: f64,

    /// Numerical tolerance for normalization and eigensolver convergence.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Jacobi sweep budget for density-matrix eigenproblems.
    #[serde(default = "default_eigen_max_sweeps")]
    pub eigen_max_sweeps: usize,

    /// Largest register whose full density matrix is diagonalized for the
    /// entropy report. Larger registers use the rank-one spectrum of `|ψ⟩⟨ψ|`.
    #[serde(default = "default_dense_entropy_max_qubits")]
    pub dense_entropy_max_qubits: usize,
}

fn default_max_qubits() -> usize {
    20
}

fn default_entanglement_threshold() -> f64 {
    DEFAULT_ENTANGLEMENT_THRESHOLD
}

fn default_entropy_cutoff() -> f64 {
    ENTROPY_CUTOFF
}

fn default_tolerance() -> f64 {
    1e-9
}

fn default_eigen_max_sweeps() -> usize {
    64
}

fn default_dense_entropy_max_qubits() -> usize {
    8
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: default_max_qubits(),
            entanglement_threshold: default_entanglement_threshold(),
            entropy_cutoff: default_entropy_cutoff(),
            tolerance: default_tolerance(),
            eigen_max_sweeps: default_eigen_max_sweeps(),
            dense_entropy_max_qubits: default_dense_entropy_max_qubits(),
        }
    }
}

impl SimulatorConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file (`.json`, else YAML).
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = if is_json(path) {
            serde_json::from_str(&text)?
        } else {
            serde_yaml_ng::from_str(&text)?
        };
        config.validate()?;
        debug!(path = %path.display(), "loaded simulator config");
        Ok(config)
    }

    /// Builder-style override of the register limit.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Builder-style override of the entanglement threshold.
    pub fn with_entanglement_threshold(mut self, threshold: f64) -> Self {
        self.entanglement_threshold = threshold;
        self
    }

    /// Apply `QSPHERE_*` environment overrides.
    ///
    /// Only variables that are set and parse cleanly replace the current
    /// values.
    pub fn merge_env(mut self) -> Self {
        if let Some(v) = env_parse("QSPHERE_MAX_QUBITS") {
            self.max_qubits = v;
        }
        if let Some(v) = env_parse("QSPHERE_ENTANGLEMENT_THRESHOLD") {
            self.entanglement_threshold = v;
        }
        if let Some(v) = env_parse("QSPHERE_ENTROPY_CUTOFF") {
            self.entropy_cutoff = v;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> SimResult<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            return Err(SimError::InvalidConfig(format!(
                "max_qubits must be in 1..={MAX_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        if !(0.0..=1.0).contains(&self.entanglement_threshold) {
            return Err(SimError::InvalidConfig(format!(
                "entanglement_threshold must be in [0, 1], got {}",
                self.entanglement_threshold
            )));
        }
        if !(self.entropy_cutoff >= 0.0 && self.entropy_cutoff < 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "entropy_cutoff must be in [0, 1), got {}",
                self.entropy_cutoff
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.eigen_max_sweeps == 0 {
            return Err(SimError::InvalidConfig(
                "eigen_max_sweeps must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}
