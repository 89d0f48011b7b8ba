//! Run command implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use qsphere_sim::{SimulationRequest, SimulationResult, Simulator, spawn};
use qsphere_state::StateVector;

use super::common::{
    load_circuit, load_config, print_histogram, print_report, resolve_initial_state,
};

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned per-qubit table.
    Table,
    /// The raw result as JSON.
    Json,
}

/// Arguments of `qsphere run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub initial: String,
    pub alpha: Option<String>,
    pub beta: Option<String>,
    pub format: OutputFormat,
    pub shots: Option<usize>,
    pub output: Option<PathBuf>,
    pub timeout: Option<u64>,
}

/// JSON document written by `--format json` and `--output`.
#[derive(Serialize)]
struct RunReport<'a> {
    #[serde(flatten)]
    result: &'a SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<&'a FxHashMap<String, usize>>,
}

/// Execute the run command.
pub async fn execute(
    options: &RunOptions,
    config_path: Option<&Path>,
    max_qubits: Option<usize>,
) -> Result<()> {
    let config = load_config(config_path, max_qubits)?;
    let circuit = load_circuit(&options.input)?;
    let initial = resolve_initial_state(
        &options.initial,
        options.alpha.as_deref(),
        options.beta.as_deref(),
    )?;

    let table = options.format == OutputFormat::Table;
    if table {
        println!(
            "{} Running {} from {}",
            style("→").cyan().bold(),
            style(options.input.display()).green(),
            style(&initial).yellow(),
        );
        println!(
            "  Loaded: {} qubits, {} gates",
            circuit.num_qubits,
            circuit.len()
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    if table {
        spinner.enable_steady_tick(Duration::from_millis(100));
    }

    let handle = spawn(
        Simulator::new(config),
        SimulationRequest::new(circuit, initial),
    );
    spinner.set_message(format!("Simulating (run {})...", handle.id()));

    let result = match options.timeout {
        Some(secs) => handle.join_timeout(Duration::from_secs(secs)).await,
        None => handle.join().await,
    };
    spinner.finish_and_clear();

    let counts = match options.shots {
        Some(shots) if result.success => Some(sample(&result, shots)?),
        _ => None,
    };
    let report = RunReport {
        result: &result,
        counts: counts.as_ref(),
    };

    if let Some(path) = &options.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        if table {
            println!("  Report written to {}", style(path.display()).green());
        }
    }

    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table if result.success => {
            print_report(&result);
            if let (Some(counts), Some(shots)) = (&counts, options.shots) {
                print_histogram(counts, shots);
            }
        }
        OutputFormat::Table => {}
    }

    if !result.success {
        anyhow::bail!(
            "Simulation failed after {:.3} ms: {}",
            result.execution_time,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

/// Sample the final state `shots` times.
fn sample(result: &SimulationResult, shots: usize) -> Result<FxHashMap<String, usize>> {
    let amplitudes = result
        .statevector()
        .context("Result carries no statevector to sample")?;
    let state = StateVector::from_amplitudes(amplitudes.to_vec())?;

    let mut rng = rand::thread_rng();
    let mut counts = FxHashMap::default();
    for _ in 0..shots {
        let outcome = state.sample(&mut rng);
        *counts.entry(state.outcome_to_bitstring(outcome)).or_insert(0) += 1;
    }
    debug!(shots, outcomes = counts.len(), "Sampled final state");
    Ok(counts)
}
