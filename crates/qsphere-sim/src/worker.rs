//! Offloading whole runs onto a blocking worker thread.
//!
//! A run is CPU-bound and has no suspension points, so it goes to Tokio's
//! blocking pool. The caller gets a [`SimulationHandle`] carrying a run id
//! and a [`CancelToken`]; there is no progress reporting while it runs.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use qsphere_state::InitialState;

use crate::cancel::CancelToken;
use crate::circuit::Circuit;
use crate::result::SimulationResult;
use crate::simulator::Simulator;

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Circuit to execute.
    pub circuit: Circuit,
    /// Preparation of qubit 0.
    #[serde(default)]
    pub initial_state: InitialState,
}

impl SimulationRequest {
    /// Create a request.
    pub fn new(circuit: Circuit, initial_state: InitialState) -> Self {
        Self {
            circuit,
            initial_state,
        }
    }
}

/// A run in flight.
#[derive(Debug)]
pub struct SimulationHandle {
    id: Uuid,
    cancel: CancelToken,
    task: JoinHandle<SimulationResult>,
    started: Instant,
}

/// Start `request` on the blocking pool.
///
/// Must be called from within a Tokio runtime.
pub fn spawn(simulator: Simulator, request: SimulationRequest) -> SimulationHandle {
    spawn_with_token(simulator, request, CancelToken::new())
}

/// As [`spawn`], sharing an existing cancellation token.
pub fn spawn_with_token(
    simulator: Simulator,
    request: SimulationRequest,
    cancel: CancelToken,
) -> SimulationHandle {
    let id = Uuid::new_v4();
    let token = cancel.clone();
    debug!(%id, num_qubits = request.circuit.num_qubits, "Dispatching simulation");

    let task = tokio::task::spawn_blocking(move || {
        simulator.run_with_cancel(&request.circuit, &request.initial_state, &token)
    });

    SimulationHandle {
        id,
        cancel,
        task,
        started: Instant::now(),
    }
}

impl SimulationHandle {
    /// Run identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the run to stop before its next gate.
    pub fn cancel(&self) {
        debug!(id = %self.id, "Cancellation requested");
        self.cancel.cancel();
    }

    /// Token shared with the worker.
    pub fn token(&self) -> &CancelToken {
        &self.cancel
    }

    /// True once the worker has returned.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the result.
    ///
    /// A worker that panicked or was aborted yields a failed result.
    pub async fn join(self) -> SimulationResult {
        let id = self.id;
        let started = self.started;
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(%id, error = %e, "Simulation worker did not complete");
                let reason = if e.is_panic() {
                    "simulation worker panicked"
                } else {
                    "simulation worker was aborted"
                };
                SimulationResult::failed(reason).with_execution_time(elapsed_ms(started))
            }
        }
    }

    /// Wait at most `timeout`; on expiry, cancel the run and return a
    /// failed result without waiting for the worker to stop.
    pub async fn join_timeout(self, timeout: Duration) -> SimulationResult {
        let cancel = self.cancel.clone();
        let started = self.started;
        let id = self.id;
        match tokio::time::timeout(timeout, self.join()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%id, ?timeout, "Simulation timed out");
                cancel.cancel();
                SimulationResult::failed(format!("simulation timed out after {timeout:?}"))
                    .with_execution_time(elapsed_ms(started))
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
