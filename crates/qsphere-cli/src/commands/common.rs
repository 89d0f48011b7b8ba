//! Shared helpers for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use tracing::debug;

use qsphere_sim::{Circuit, InitialState, SimulationResult, SimulatorConfig};

/// Load a circuit from a JSON or YAML file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Circuit::from_file(path).with_context(|| format!("Failed to load circuit: {}", path.display()))
}

/// Return the default config file location (~/.qsphere/config.yaml).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qsphere").join("config.yaml"))
}

/// Resolve the simulator configuration.
///
/// An explicit file must exist; the default file is used only if present.
/// `QSPHERE_*` environment overrides apply on top, then `max_qubits`.
pub fn load_config(explicit: Option<&Path>, max_qubits: Option<usize>) -> Result<SimulatorConfig> {
    let mut config = match explicit {
        Some(path) => SimulatorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                debug!(path = %path.display(), "Using default config file");
                SimulatorConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?
            }
            None => SimulatorConfig::default(),
        },
    }
    .merge_env();

    if let Some(max) = max_qubits {
        config.max_qubits = max;
    }
    config.validate()?;
    Ok(config)
}

/// Parse `re`, `re,im` or `re, im` into a complex amplitude.
pub fn parse_complex(text: &str) -> Result<Complex64> {
    let mut parts = text.split(',').map(str::trim);
    let re = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Empty amplitude"))?;
    let re: f64 = re
        .parse()
        .with_context(|| format!("Invalid real part in '{text}'"))?;
    let im: f64 = match parts.next() {
        Some(s) => s
            .parse()
            .with_context(|| format!("Invalid imaginary part in '{text}'"))?,
        None => 0.0,
    };
    if parts.next().is_some() {
        anyhow::bail!("Expected 're,im', got '{text}'");
    }
    Ok(Complex64::new(re, im))
}

/// Pick the initial state: custom amplitudes win over a named preset.
pub fn resolve_initial_state(
    preset: &str,
    alpha: Option<&str>,
    beta: Option<&str>,
) -> Result<InitialState> {
    if alpha.is_none() && beta.is_none() {
        return preset.parse::<InitialState>().map_err(Into::into);
    }
    let alpha = alpha.map(parse_complex).transpose()?.unwrap_or_default();
    let beta = beta.map(parse_complex).transpose()?.unwrap_or_default();
    if alpha.norm_sqr() + beta.norm_sqr() == 0.0 {
        anyhow::bail!("Custom amplitudes must not both be zero");
    }
    Ok(InitialState::custom(alpha, beta))
}

/// Print the per-qubit report as a table.
pub fn print_report(result: &SimulationResult) {
    println!(
        "\n{} {} qubit(s) in {:.3} ms",
        style("✓").green().bold(),
        result.qubit_results.len(),
        result.execution_time
    );
    println!(
        "\n  {:>3}  {:>8} {:>8} {:>8}  {:>6}  {:>6}  {:>6}  {:>7}  {}",
        style("q").bold(),
        style("x").bold(),
        style("y").bold(),
        style("z").bold(),
        style("purity").bold(),
        style("C").bold(),
        style("S").bold(),
        style("witness").bold(),
        style("entangled").bold(),
    );

    for q in &result.qubit_results {
        let b = q.bloch_vector;
        println!(
            "  {:>3}  {:>8.4} {:>8.4} {:>8.4}  {:>6.4}  {:>6.4}  {:>6.4}  {:>7.4}  {}",
            style(q.qubit_index).cyan(),
            b.x,
            b.y,
            b.z,
            q.purity,
            q.concurrence,
            q.von_neumann_entropy,
            q.witness_value,
            if q.is_entangled {
                style("yes").yellow()
            } else {
                style("no").dim()
            }
        );
    }

    if result.numeric_clamps > 0 {
        println!(
            "\n  {} {} non-finite value(s) were zeroed",
            style("!").yellow().bold(),
            result.numeric_clamps
        );
    }
}

/// Print a measurement histogram, most frequent first.
pub fn print_histogram(counts: &FxHashMap<String, usize>, shots: usize) {
    println!("\n{} Samples ({} shots):", style("✓").green().bold(), shots);

    let sorted = sorted_counts(counts);
    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / shots as f64 * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}

/// Counts ordered by frequency, ties broken by bitstring.
pub fn sorted_counts(counts: &FxHashMap<String, usize>) -> Vec<(&String, usize)> {
    let mut sorted: Vec<_> = counts.iter().map(|(k, &v)| (k, v)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complex() {
        assert_eq!(parse_complex("0.6").unwrap(), Complex64::new(0.6, 0.0));
        assert_eq!(parse_complex("0.6,0.8").unwrap(), Complex64::new(0.6, 0.8));
        assert_eq!(parse_complex(" -1 , -0.5 ").unwrap(), Complex64::new(-1.0, -0.5));
        assert!(parse_complex("").is_err());
        assert!(parse_complex("a,b").is_err());
        assert!(parse_complex("1,2,3").is_err());
    }

    #[test]
    fn test_resolve_initial_state() {
        assert_eq!(
            resolve_initial_state("+", None, None).unwrap(),
            InitialState::Plus
        );
        assert!(resolve_initial_state("bogus", None, None).is_err());
        assert_eq!(
            resolve_initial_state("0", None, Some("1")).unwrap(),
            InitialState::custom(Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0))
        );
        assert!(resolve_initial_state("0", Some("0"), Some("0,0")).is_err());
    }

    #[test]
    fn test_sorted_counts() {
        let mut counts = FxHashMap::default();
        counts.insert("11".to_string(), 40);
        counts.insert("00".to_string(), 40);
        counts.insert("01".to_string(), 20);
        let sorted = sorted_counts(&counts);
        assert_eq!(sorted[0].0, "00");
        assert_eq!(sorted[1].0, "11");
        assert_eq!(sorted[2].1, 20);
    }

    #[test]
    fn test_load_config_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "max_qubits: 6\n").unwrap();
        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.max_qubits, 6);

        let config = load_config(Some(&path), Some(4)).unwrap();
        assert_eq!(config.max_qubits, 4);

        assert!(load_config(Some(&path), Some(0)).is_err());
        assert!(load_config(Some(&dir.path().join("missing.yaml")), None).is_err());
    }

    #[test]
    fn test_load_circuit_missing() {
        let err = load_circuit(Path::new("/nonexistent/circuit.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
