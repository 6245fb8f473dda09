//! Validate a configuration file without running it.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;

pub fn run(config_path: Option<String>) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    config.simulation.validate()?;

    println!("{} Configuration is valid", "✓".green().bold());
    println!(
        "  Grid:       {} × {} × {} ({} sites)",
        config.simulation.grid_width,
        config.simulation.grid_height,
        config.simulation.grid_depth,
        config.simulation.volume().to_string().cyan()
    );
    println!(
        "  Carriers:   up to {} ({}% of volume)",
        config.simulation.max_carriers().to_string().cyan(),
        config.simulation.charge_fraction * 100.0
    );
    println!(
        "  Bias:       {} V → {} V across {} columns",
        config.simulation.voltage_source,
        config.simulation.voltage_drain,
        config.simulation.grid_width
    );
    println!("  Ticks:      {}", config.simulation.iterations.to_string().cyan());
    println!("  Output:     {}/{}-*.dat", config.output.directory, config.output.stub);

    Ok(())
}
