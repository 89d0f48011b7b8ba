//! qsphere circuit execution
//!
//! The single entry point external collaborators call: hand a [`Circuit`]
//! and an [`InitialState`] to a [`Simulator`] and get back a
//! [`SimulationResult`] with one [`QubitResult`] per qubit.
//!
//! # Failure containment
//!
//! [`Simulator::run`] never returns an error and never panics on bad input.
//! Unknown gates, operand mismatches, oversized registers and cancellation
//! all come back as `success: false` with a message and the time spent.
//!
//! # Example
//!
//! ```rust
//! use qsphere_sim::{Circuit, InitialState, Simulator, SimulatorConfig};
//!
//! let simulator = Simulator::new(SimulatorConfig::default());
//! let result = simulator.run(&Circuit::bell(), &InitialState::Zero);
//!
//! assert!(result.success);
//! for qubit in &result.qubit_results {
//!     assert!(qubit.is_entangled);
//!     assert!((qubit.purity - 0.5).abs() < 1e-9);
//! }
//! ```
//!
//! Long runs can be moved off the async executor with [`worker::spawn`].

pub mod cancel;
pub mod circuit;
pub mod config;
pub mod error;
pub mod result;
pub mod simulator;
pub mod worker;

pub use cancel::CancelToken;
pub use circuit::{Circuit, GateOp};
pub use config::SimulatorConfig;
pub use error::{SimError, SimResult};
pub use qsphere_state::{BlochVector, InitialState};
pub use result::{QubitResult, SimulationResult};
pub use simulator::{Evolution, Simulator};
pub use worker::{SimulationHandle, SimulationRequest, spawn, spawn_with_token};
