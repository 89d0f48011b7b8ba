//! qsphere Command-Line Interface
//!
//! Runs a circuit file through the statevector simulator and prints the
//! per-qubit Bloch report.
//!
//! ```text
//!             z |0⟩
//!               │
//!          .-"""│"""-.
//!        /      │      \
//!       |       ●───────|──── y
//!        \     /       /
//!          '-./.....-'
//!            x    |1⟩
//!
//!         Q S P H E R E
//!   statevector + Bloch diagnostics
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::run::{OutputFormat, RunOptions};
use commands::{gates, run, version};

/// qsphere - statevector simulation with per-qubit Bloch diagnostics
#[derive(Parser)]
#[command(name = "qsphere")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Simulator config file (YAML or JSON); defaults to ~/.qsphere/config.yaml
    #[arg(long, global = true, env = "QSPHERE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the largest accepted register
    #[arg(long, global = true, env = "QSPHERE_MAX_QUBITS")]
    max_qubits: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a circuit and report every qubit
    Run {
        /// Circuit file (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Initial state of qubit 0 (0, 1, +, -, +i, -i)
        #[arg(long, default_value = "0")]
        initial: String,

        /// Custom |0⟩ amplitude for qubit 0, as `re,im`
        #[arg(long, allow_hyphen_values = true)]
        alpha: Option<String>,

        /// Custom |1⟩ amplitude for qubit 0, as `re,im`
        #[arg(long, allow_hyphen_values = true)]
        beta: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Also sample the final state this many times
        #[arg(short, long)]
        shots: Option<usize>,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up (and cancel the run) after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List the gate catalogue
    Gates,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            initial,
            alpha,
            beta,
            format,
            shots,
            output,
            timeout,
        } => {
            let options = RunOptions {
                input,
                initial,
                alpha,
                beta,
                format,
                shots,
                output,
                timeout,
            };
            run::execute(&options, cli.config.as_deref(), cli.max_qubits).await
        }

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
