//! Simulation configuration contract.
//!
//! All tunable parameters for a run live here. The external parser (CLI
//! or test harness) fills the struct; `validate()` rejects malformed
//! configuration before any lattice or potential is constructed — there
//! is no partial-run recovery path.

use crate::error::{ConfigError, PolaronError, Result};
use crate::types::HopRange;
use serde::{Deserialize, Serialize};

/// Coupling constants indexed by (from-role, to-role) dense indices.
///
/// Multiplies the attempt probability for a hop between two site roles.
/// Rows/columns follow `SiteRole::as_index()`: normal, defect, source,
/// drain. Transitions involving defects are physically blocked before
/// the coupling is consulted, so those entries default to zero.
pub type CouplingMatrix = [[f64; 4]; 4];

fn default_coupling() -> CouplingMatrix {
    [
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
    ]
}

fn default_grid_width() -> usize { 1024 }
fn default_grid_height() -> usize { 256 }
fn default_grid_depth() -> usize { 1 }
fn default_trap_depth() -> f64 { -0.5 }
fn default_charge_fraction() -> f64 { 0.01 }
fn default_temperature_kt() -> f64 { 0.025 }
fn default_coulomb_prefactor() -> f64 { 0.01 }
fn default_coulomb_cutoff() -> f64 { 50.0 }
fn default_voltage_drain() -> f64 { -1.0 }
fn default_random_seed() -> u64 { 0 }
fn default_iterations() -> u64 { 10_000 }

/// Everything a run needs, in one validated bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Grid width — the transport axis between source and drain.
    #[serde(default = "default_grid_width")]
    pub grid_width: usize,
    /// Grid height.
    #[serde(default = "default_grid_height")]
    pub grid_height: usize,
    /// Grid depth (number of layers).
    #[serde(default = "default_grid_depth")]
    pub grid_depth: usize,

    /// Fraction of grid sites classified as defects, in [0, 1].
    #[serde(default)]
    pub defect_fraction: f64,
    /// Fraction of grid sites carrying a trap well, in [0, 1].
    #[serde(default)]
    pub trap_fraction: f64,
    /// Energy added at each trap site (negative = a well).
    #[serde(default = "default_trap_depth")]
    pub trap_depth: f64,
    /// Maximum live carriers as a fraction of grid volume, in [0, 1].
    #[serde(default = "default_charge_fraction")]
    pub charge_fraction: f64,

    /// Hop range policy (Manhattan distance over grid coordinates).
    #[serde(default)]
    pub hop_range: HopRange,
    /// Thermal energy kT for Metropolis acceptance.
    #[serde(default = "default_temperature_kt")]
    pub temperature_kt: f64,
    /// Coulomb interaction prefactor (q² / 4πε, in lattice units).
    #[serde(default = "default_coulomb_prefactor")]
    pub coulomb_prefactor: f64,
    /// Pairwise interactions beyond this distance are ignored.
    #[serde(default = "default_coulomb_cutoff")]
    pub coulomb_cutoff: f64,
    /// Bias potential at the source column.
    #[serde(default)]
    pub voltage_source: f64,
    /// Bias potential at the drain column.
    #[serde(default = "default_voltage_drain")]
    pub voltage_drain: f64,
    /// Coupling constants by (from-role, to-role).
    #[serde(default = "default_coupling")]
    pub coupling: CouplingMatrix,

    /// Seed for the run's random stream.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// Injection attempts per tick; `None` injects up to capacity.
    #[serde(default)]
    pub source_attempts: Option<u32>,
    /// Pre-seed carriers randomly on the grid before the first tick.
    #[serde(default)]
    pub seed_charges: bool,
    /// Batch the Coulomb layer into one bulk recomputation per tick.
    #[serde(default)]
    pub accelerated: bool,
    /// Number of ticks to run.
    #[serde(default = "default_iterations")]
    pub iterations: u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            grid_width: default_grid_width(),
            grid_height: default_grid_height(),
            grid_depth: default_grid_depth(),
            defect_fraction: 0.0,
            trap_fraction: 0.0,
            trap_depth: default_trap_depth(),
            charge_fraction: default_charge_fraction(),
            hop_range: HopRange::default(),
            temperature_kt: default_temperature_kt(),
            coulomb_prefactor: default_coulomb_prefactor(),
            coulomb_cutoff: default_coulomb_cutoff(),
            voltage_source: 0.0,
            voltage_drain: default_voltage_drain(),
            coupling: default_coupling(),
            random_seed: default_random_seed(),
            source_attempts: None,
            seed_charges: false,
            accelerated: false,
            iterations: default_iterations(),
        }
    }
}

impl SimulationParameters {
    /// Reject malformed configuration with a diagnostic naming the
    /// offending value. Called before any component is constructed.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("grid_width", self.grid_width),
            ("grid_height", self.grid_height),
            ("grid_depth", self.grid_depth),
        ] {
            if value == 0 {
                return Err(PolaronError::Config(ConfigError::EmptyGrid {
                    field: field.to_string(),
                }));
            }
        }
        for (field, value) in [
            ("defect_fraction", self.defect_fraction),
            ("trap_fraction", self.trap_fraction),
            ("charge_fraction", self.charge_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(PolaronError::out_of_range(field, 0.0, 1.0, value));
            }
        }
        if self.temperature_kt <= 0.0 || !self.temperature_kt.is_finite() {
            return Err(PolaronError::invalid_config(
                "temperature_kt",
                self.temperature_kt.to_string(),
                "thermal energy must be positive and finite",
            ));
        }
        if self.hop_range.0 == 0 {
            return Err(PolaronError::invalid_config(
                "hop_range",
                "0",
                "hop range must be at least 1",
            ));
        }
        if self.coulomb_cutoff <= 0.0 {
            return Err(PolaronError::invalid_config(
                "coulomb_cutoff",
                self.coulomb_cutoff.to_string(),
                "cutoff must be positive",
            ));
        }
        for row in &self.coupling {
            for &c in row {
                if !(0.0..=1.0).contains(&c) || c.is_nan() {
                    return Err(PolaronError::out_of_range("coupling", 0.0, 1.0, c));
                }
            }
        }
        Ok(())
    }

    /// Grid volume implied by the dimensions.
    pub fn volume(&self) -> usize {
        self.grid_width * self.grid_height * self.grid_depth
    }

    /// Maximum concurrently live carriers for this configuration.
    pub fn max_carriers(&self) -> usize {
        (self.charge_fraction * self.volume() as f64) as usize
    }
}
