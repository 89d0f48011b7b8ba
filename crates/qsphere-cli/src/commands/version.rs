//! Version command implementation.

use console::style;

use qsphere_gates::catalogue;
use qsphere_sim::SimulatorConfig;
use qsphere_state::MAX_QUBITS;

use super::common::default_config_path;

/// Execute the version command.
pub fn execute() {
    println!(
        "{} {}",
        style("qsphere").cyan().bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).yellow()
    );

    let defaults = SimulatorConfig::default();
    let config = match default_config_path() {
        Some(path) if path.exists() => style(path.display().to_string()).green(),
        Some(path) => style(format!("{} (not present)", path.display())).dim(),
        None => style("no home directory".to_string()).dim(),
    };

    let rows = [
        ("Gates", format!("{} in catalogue", catalogue().count())),
        (
            "Register",
            format!("{} qubits by default, {MAX_QUBITS} hard limit", defaults.max_qubits),
        ),
        (
            "Entropy",
            format!(
                "dense eigensolve up to {} qubits",
                defaults.dense_entropy_max_qubits
            ),
        ),
    ];
    for (label, value) in rows {
        println!("  {:<10} {}", style(label).bold(), value);
    }
    println!("  {:<10} {}", style("Config").bold(), config);
    println!(
        "  {:<10} {} ({})",
        style("Source").bold(),
        style(env!("CARGO_PKG_REPOSITORY")).underlined(),
        env!("CARGO_PKG_LICENSE")
    );
}
