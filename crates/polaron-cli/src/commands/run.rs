//! Run a simulation from a configuration file.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use polaron::prelude::*;

use crate::config::Config;
use crate::sink::FileSink;

pub fn run(
    config_path: Option<String>,
    ticks: Option<u64>,
    seed: Option<u64>,
    output: Option<String>,
    verbose: bool,
) -> Result<()> {
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(ticks) = ticks {
        config.simulation.iterations = ticks;
    }
    if let Some(seed) = seed {
        config.simulation.random_seed = seed;
    }
    if let Some(output) = output {
        config.output.directory = output;
    }

    let ticks = config.simulation.iterations;
    let reports = config.output.reports.clone();
    let mut sink = FileSink::new(&config.output.directory, &config.output.stub)
        .with_context(|| format!("Failed to prepare output directory {}", config.output.directory))?;

    println!("{} Building device...", "→".blue());
    let mut simulation = Simulation::new(config.simulation)?;
    println!(
        "  {} sites, {} defects, {} traps, seed {}",
        simulation.lattice().volume().to_string().cyan(),
        simulation.defect_sites().len().to_string().cyan(),
        simulation.potential().trap_sites().len().to_string().cyan(),
        simulation.params().random_seed.to_string().cyan()
    );

    let run_id = simulation.run_id();
    if reports.field_energy {
        sink.energy_grid(
            run_id,
            0,
            EnergyLayer::Field,
            simulation.potential().bias_grid(simulation.lattice()),
        )?;
    }
    if reports.trap_energy {
        sink.energy_grid(
            run_id,
            0,
            EnergyLayer::Trap,
            simulation.potential().trap_grid(simulation.lattice()),
        )?;
    }
    if reports.defect_ids {
        sink.site_list(run_id, SiteList::Defects, simulation.defect_sites())?;
    }
    if reports.trap_ids {
        sink.site_list(run_id, SiteList::Traps, simulation.potential().trap_sites())?;
    }

    println!("{} Running {} ticks...", "→".blue(), ticks.to_string().cyan());
    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks")
            .unwrap()
            .progress_chars("#>-"),
    );

    for _ in 0..ticks {
        let fates_before = simulation.fates().len();
        let events = simulation.tick()?;
        if reports.carrier_stats {
            for i in fates_before..simulation.fates().len() {
                let fate = simulation.fates()[i];
                sink.carrier_fate(run_id, &fate)?;
            }
        }
        if verbose && events.len() > 1 {
            pb.println(format!("  {} events", events.len() - 1));
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if reports.coulomb_energy {
        let occupied = simulation.lattice().occupied_sites();
        let grid = simulation
            .potential()
            .coulomb_energy_grid(simulation.lattice(), &occupied);
        sink.energy_grid(run_id, simulation.current_tick(), EnergyLayer::Coulomb, &grid)?;
    }
    if reports.carrier_positions {
        sink.carrier_snapshot(run_id, simulation.current_tick(), &simulation.carrier_snapshot())?;
    }

    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    let report = metrics::compute(&simulation);
    metrics::print_report(&report);

    Ok(())
}
