//! Quantitative transport metrics computed from simulation state.
//!
//! Three categories:
//! - Throughput: how much charge the device moved
//! - Carrier statistics: lifetime and path length of absorbed carriers
//! - Landscape: how disordered the device was configured
//!
//! Everything here reads committed state only; computing metrics never
//! perturbs a run.

use crate::simulation::Simulation;
use serde::Serialize;

/// Throughput metrics — what the device delivered.
#[derive(Debug, Clone, Serialize)]
pub struct ThroughputMetrics {
    /// Total charges absorbed at the drain.
    pub charges_accepted: u64,
    /// Total carriers placed on the grid, injected or seeded.
    pub carriers_injected: u64,
    /// Carriers still in transit.
    pub carriers_live: usize,
    /// Charges absorbed per tick, averaged over the run so far.
    pub absorption_rate: f64,
    /// Fraction of injected carriers that reached the drain.
    pub collection_efficiency: f64,
}

/// Carrier statistics over every absorbed carrier.
#[derive(Debug, Clone, Serialize)]
pub struct CarrierStatistics {
    pub absorbed: usize,
    /// Mean ticks from placement to absorption.
    pub mean_lifetime: f64,
    /// Mean cumulative path length, in lattice units.
    pub mean_path_length: f64,
    /// Mean path length per tick of life.
    pub mean_speed: f64,
    pub max_lifetime: u64,
    pub min_lifetime: u64,
}

/// Landscape metrics — the disorder the carriers moved through.
#[derive(Debug, Clone, Serialize)]
pub struct LandscapeMetrics {
    pub volume: usize,
    pub defect_sites: usize,
    pub trap_sites: usize,
    pub defect_density: f64,
    pub trap_density: f64,
    /// Live carriers per grid site.
    pub carrier_density: f64,
}

/// All transport metrics combined.
#[derive(Debug, Clone, Serialize)]
pub struct TransportMetrics {
    pub tick: u64,
    pub throughput: ThroughputMetrics,
    pub carriers: CarrierStatistics,
    pub landscape: LandscapeMetrics,
}

/// Compute all metrics from the simulation's current state.
pub fn compute(simulation: &Simulation) -> TransportMetrics {
    TransportMetrics {
        tick: simulation.current_tick(),
        throughput: compute_throughput(simulation),
        carriers: compute_carrier_statistics(simulation),
        landscape: compute_landscape(simulation),
    }
}

fn compute_throughput(simulation: &Simulation) -> ThroughputMetrics {
    let accepted = simulation.charges_accepted();
    let injected = simulation.total_injected();
    let ticks = simulation.current_tick();

    let absorption_rate = if ticks > 0 {
        accepted as f64 / ticks as f64
    } else {
        0.0
    };
    let collection_efficiency = if injected > 0 {
        accepted as f64 / injected as f64
    } else {
        0.0
    };

    ThroughputMetrics {
        charges_accepted: accepted,
        carriers_injected: injected,
        carriers_live: simulation.live_carriers(),
        absorption_rate,
        collection_efficiency,
    }
}

fn compute_carrier_statistics(simulation: &Simulation) -> CarrierStatistics {
    let fates = simulation.fates();
    if fates.is_empty() {
        return CarrierStatistics {
            absorbed: 0,
            mean_lifetime: 0.0,
            mean_path_length: 0.0,
            mean_speed: 0.0,
            max_lifetime: 0,
            min_lifetime: 0,
        };
    }

    let n = fates.len() as f64;
    let lifetime_sum: u64 = fates.iter().map(|f| f.lifetime).sum();
    let path_sum: f64 = fates.iter().map(|f| f.displacement).sum();
    let speed_sum: f64 = fates
        .iter()
        .filter(|f| f.lifetime > 0)
        .map(|f| f.displacement / f.lifetime as f64)
        .sum();

    CarrierStatistics {
        absorbed: fates.len(),
        mean_lifetime: lifetime_sum as f64 / n,
        mean_path_length: path_sum / n,
        mean_speed: speed_sum / n,
        max_lifetime: fates.iter().map(|f| f.lifetime).max().unwrap_or(0),
        min_lifetime: fates.iter().map(|f| f.lifetime).min().unwrap_or(0),
    }
}

fn compute_landscape(simulation: &Simulation) -> LandscapeMetrics {
    let volume = simulation.lattice().volume();
    let defects = simulation.defect_sites().len();
    let traps = simulation.potential().trap_sites().len();

    LandscapeMetrics {
        volume,
        defect_sites: defects,
        trap_sites: traps,
        defect_density: defects as f64 / volume as f64,
        trap_density: traps as f64 / volume as f64,
        carrier_density: simulation.live_carriers() as f64 / volume as f64,
    }
}

/// Print a formatted metrics report to the terminal.
pub fn print_report(metrics: &TransportMetrics) {
    println!("── Transport Summary ───────────────────────────────");
    println!("  Throughput (tick {}):", metrics.tick);
    println!("    Charges accepted:          {}", metrics.throughput.charges_accepted);
    println!("    Carriers injected:         {}", metrics.throughput.carriers_injected);
    println!("    Carriers in transit:       {}", metrics.throughput.carriers_live);
    println!("    Absorption rate:           {:.4} / tick", metrics.throughput.absorption_rate);
    println!("    Collection efficiency:     {:.1}%",
        metrics.throughput.collection_efficiency * 100.0);
    println!();
    println!("  Absorbed Carriers:");
    println!("    Count:                     {}", metrics.carriers.absorbed);
    println!("    Mean lifetime:             {:.1} ticks", metrics.carriers.mean_lifetime);
    println!("    Mean path length:          {:.1} sites", metrics.carriers.mean_path_length);
    println!("    Mean speed:                {:.3} sites/tick", metrics.carriers.mean_speed);
    println!("    Lifetime range:            {} – {} ticks",
        metrics.carriers.min_lifetime,
        metrics.carriers.max_lifetime);
    println!();
    println!("  Landscape:");
    println!("    Grid volume:               {} sites", metrics.landscape.volume);
    println!("    Defect density:            {:.3}", metrics.landscape.defect_density);
    println!("    Trap density:              {:.3}", metrics.landscape.trap_density);
    println!("    Carrier density:           {:.4}", metrics.landscape.carrier_density);
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaron_core::params::SimulationParameters;

    #[test]
    fn metrics_compute_on_fresh_simulation() {
        let sim = Simulation::new(SimulationParameters {
            grid_width: 6,
            grid_height: 6,
            grid_depth: 1,
            ..Default::default()
        })
        .unwrap();
        let metrics = compute(&sim);
        assert_eq!(metrics.throughput.charges_accepted, 0);
        assert_eq!(metrics.carriers.absorbed, 0);
        assert_eq!(metrics.landscape.volume, 36);
    }

    #[test]
    fn metrics_compute_after_transport() {
        let mut sim = Simulation::new(SimulationParameters {
            grid_width: 6,
            grid_height: 4,
            grid_depth: 1,
            charge_fraction: 0.5,
            voltage_drain: -4.0,
            random_seed: 3,
            ..Default::default()
        })
        .unwrap();
        sim.run(200).unwrap();

        let metrics = compute(&sim);
        assert!(metrics.throughput.carriers_injected > 0);
        assert!(metrics.throughput.charges_accepted > 0);
        assert!(metrics.carriers.mean_lifetime >= 1.0);
        print_report(&metrics);
    }
}
