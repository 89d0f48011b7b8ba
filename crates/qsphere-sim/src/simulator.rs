//! Circuit execution and per-qubit analysis.

use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use qsphere_gates::Gate;
use qsphere_state::{
    DensityMatrix, InitialState, StateVector, concurrence, entropy_from_eigenvalues,
    is_entangled, qubit_concurrence, witness_value,
};

use crate::cancel::CancelToken;
use crate::circuit::Circuit;
use crate::config::SimulatorConfig;
use crate::error::{SimError, SimResult};
use crate::result::{QubitResult, SimulationResult};

/// A final state plus the number of non-finite amplitudes zeroed on the way.
#[derive(Debug, Clone)]
pub struct Evolution {
    /// State after the last gate.
    pub state: StateVector,
    /// Non-finite values replaced by zero.
    pub numeric_clamps: usize,
}

/// Statevector circuit executor.
///
/// Holds no state between runs; every call builds a fresh statevector.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with the given configuration.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Execute `circuit` from `initial` and report every qubit.
    ///
    /// Never fails: any error becomes a result with `success == false`, an
    /// empty qubit list and the time spent up to the failure.
    pub fn run(&self, circuit: &Circuit, initial: &InitialState) -> SimulationResult {
        self.run_with_cancel(circuit, initial, &CancelToken::new())
    }

    /// As [`run`](Self::run), checking `cancel` before every gate.
    #[instrument(skip_all, fields(num_qubits = circuit.num_qubits, gates = circuit.len()))]
    pub fn run_with_cancel(
        &self,
        circuit: &Circuit,
        initial: &InitialState,
        cancel: &CancelToken,
    ) -> SimulationResult {
        let start = Instant::now();
        debug!(%initial, "Starting simulation");

        let mut numeric_clamps = 0;
        let outcome = self
            .evolve_counting(circuit, initial, cancel, &mut numeric_clamps)
            .and_then(|state| self.analyze(&state));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        finish(outcome, numeric_clamps, elapsed_ms)
    }

    /// Build, initialize and evolve a statevector without analysing it.
    pub fn evolve(
        &self,
        circuit: &Circuit,
        initial: &InitialState,
        cancel: &CancelToken,
    ) -> SimResult<Evolution> {
        let mut numeric_clamps = 0;
        let state = self.evolve_counting(circuit, initial, cancel, &mut numeric_clamps)?;
        Ok(Evolution {
            state,
            numeric_clamps,
        })
    }

    /// Evolve, adding every zeroed non-finite amplitude to `numeric_clamps`
    /// as it happens so the count survives a later failure.
    fn evolve_counting(
        &self,
        circuit: &Circuit,
        initial: &InitialState,
        cancel: &CancelToken,
        numeric_clamps: &mut usize,
    ) -> SimResult<StateVector> {
        circuit.validate(self.config.max_qubits)?;

        let mut state = StateVector::new(circuit.num_qubits)?;
        state.initialize(initial)?;

        for (i, op) in circuit.gates.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(gate_index = i, "Cancelled before gate");
                return Err(SimError::Cancelled);
            }
            let gate = Gate::from_name(&op.name, &op.parameters)?;
            state.apply_gate(&gate, &op.qubits)?;
            trace!(gate_index = i, gate = %gate, qubits = ?op.qubits, "Applied");

            let clamped = state.sanitize();
            if clamped > 0 {
                warn!(gate_index = i, clamped, "Non-finite amplitudes zeroed");
                *numeric_clamps += clamped;
                state.normalize()?;
            }
        }

        if !state.is_normalized(self.config.tolerance.max(1e-6)) {
            warn!(norm_sqr = state.norm_sqr(), "Final state drifted from unit norm");
            state.normalize()?;
        }

        Ok(state)
    }

    /// Entropy of the full density matrix `|ψ⟩⟨ψ|`.
    ///
    /// Small registers are diagonalized directly. Above
    /// `dense_entropy_max_qubits` the spectrum is taken from the rank-one
    /// structure: the only nonzero eigenvalue is `⟨ψ|ψ⟩`.
    pub fn full_entropy(&self, state: &StateVector) -> SimResult<f64> {
        let cutoff = self.config.entropy_cutoff;
        if state.num_qubits() <= self.config.dense_entropy_max_qubits {
            let rho = DensityMatrix::from_state(state);
            Ok(rho.von_neumann_entropy(
                cutoff,
                self.config.eigen_max_sweeps,
                self.config.tolerance,
            )?)
        } else {
            Ok(entropy_from_eigenvalues(&[state.norm_sqr()], cutoff))
        }
    }

    /// Per-qubit diagnostics for a state.
    ///
    /// `concurrence` is the Wootters value of the full density matrix when
    /// the register has exactly two qubits and zero otherwise. Each qubit
    /// also carries its concurrence and entropy with respect to the rest.
    pub fn analyze(&self, state: &StateVector) -> SimResult<Vec<QubitResult>> {
        let n = state.num_qubits();
        let pair_concurrence = if n == 2 {
            let rho = DensityMatrix::from_state(state);
            concurrence(&rho, self.config.eigen_max_sweeps, self.config.tolerance)?
        } else {
            0.0
        };
        let entropy = self.full_entropy(state)?;
        let witness = witness_value(pair_concurrence, self.config.entanglement_threshold);

        (0..n)
            .map(|q| -> SimResult<QubitResult> {
                let rho = state.reduced_density_matrix(q)?;
                let bloch = rho.bloch_vector();

                Ok(QubitResult {
                    qubit_index: q,
                    bloch_vector: bloch,
                    purity: rho.purity(),
                    reduced_radius: bloch.radius(),
                    is_entangled: is_entangled(witness),
                    concurrence: pair_concurrence,
                    von_neumann_entropy: entropy,
                    witness_value: witness,
                    rest_concurrence: qubit_concurrence(&rho),
                    reduced_entropy: rho.von_neumann_entropy(self.config.entropy_cutoff),
                    statevector: (q == 0).then(|| state.amplitudes().to_vec()),
                })
            })
            .collect()
    }
}

/// Turn a run outcome into the public result record.
fn finish(
    outcome: SimResult<Vec<QubitResult>>,
    numeric_clamps: usize,
    elapsed_ms: f64,
) -> SimulationResult {
    let result = match outcome {
        Ok(results) => {
            debug!(elapsed_ms, "Simulation completed");
            SimulationResult::completed(results)
        }
        Err(e) => {
            warn!(error = %e, elapsed_ms, numeric_clamps, "Simulation failed");
            SimulationResult::failed(e.to_string())
        }
    };
    result
        .with_execution_time(elapsed_ms)
        .with_numeric_clamps(numeric_clamps)
}
