//! Gates command implementation.

use console::style;

use qsphere_gates::catalogue;

/// Execute the gates command.
pub fn execute() {
    println!("{} Gate catalogue:\n", style("qsphere").cyan().bold());
    println!(
        "  {:<6} {:>6} {:>6}  {}",
        style("name").bold(),
        style("qubits").bold(),
        style("params").bold(),
        style("description").bold()
    );

    for kind in catalogue() {
        println!(
            "  {:<6} {:>6} {:>6}  {}",
            style(kind.name()).green(),
            kind.num_qubits(),
            kind.num_parameters(),
            kind.description()
        );
    }

    println!();
    println!(
        "  Names are case-insensitive. Omitted rotation angles default to {}.",
        style("π/2").yellow()
    );
}
