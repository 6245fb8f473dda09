//! Reporting sink contract.
//!
//! The core produces per-site energy grids, site classification lists,
//! carrier snapshots, and per-carrier absorption records; a sink turns
//! them into durable storage. File naming, backup rotation, directory
//! creation, and serialization format are entirely the sink's problem —
//! nothing in the runtime touches a path.

use polaron_core::error::Result;
use polaron_core::types::{CarrierFate, CarrierId, EnergyLayer, RunId, SiteIndex, SiteList, Tick};
use serde::{Deserialize, Serialize};

/// Receiver for everything a run wants persisted.
pub trait ReportSink {
    /// A full per-site scalar grid for one energy layer.
    fn energy_grid(
        &mut self,
        run: RunId,
        tick: Tick,
        layer: EnergyLayer,
        values: &[f64],
    ) -> Result<()>;

    /// The site indices carrying one classification (defects or traps).
    fn site_list(&mut self, run: RunId, list: SiteList, sites: &[SiteIndex]) -> Result<()>;

    /// A snapshot of every live carrier as (site, carrier id).
    fn carrier_snapshot(
        &mut self,
        run: RunId,
        tick: Tick,
        carriers: &[(SiteIndex, CarrierId)],
    ) -> Result<()>;

    /// One record per carrier removed at the drain.
    fn carrier_fate(&mut self, run: RunId, fate: &CarrierFate) -> Result<()>;
}

/// Which reports a run emits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Emit the linear bias layer after setup.
    #[serde(default)]
    pub field_energy: bool,
    /// Emit the trap layer after setup.
    #[serde(default)]
    pub trap_energy: bool,
    /// Emit the defect site-id list after setup.
    #[serde(default)]
    pub defect_ids: bool,
    /// Emit the trap site-id list after setup.
    #[serde(default)]
    pub trap_ids: bool,
    /// Emit the Coulomb layer after the final tick.
    #[serde(default)]
    pub coulomb_energy: bool,
    /// Emit live carrier positions after the final tick.
    #[serde(default)]
    pub carrier_positions: bool,
    /// Emit one (tick, lifetime, displacement) record per absorption.
    #[serde(default)]
    pub carrier_stats: bool,
}

impl ReportOptions {
    /// Enable every report.
    pub fn all() -> Self {
        Self {
            field_energy: true,
            trap_energy: true,
            defect_ids: true,
            trap_ids: true,
            coulomb_energy: true,
            carrier_positions: true,
            carrier_stats: true,
        }
    }
}

/// Sink that drops everything. The default when no reporting is wanted.
#[derive(Debug, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn energy_grid(&mut self, _: RunId, _: Tick, _: EnergyLayer, _: &[f64]) -> Result<()> {
        Ok(())
    }

    fn site_list(&mut self, _: RunId, _: SiteList, _: &[SiteIndex]) -> Result<()> {
        Ok(())
    }

    fn carrier_snapshot(&mut self, _: RunId, _: Tick, _: &[(SiteIndex, CarrierId)]) -> Result<()> {
        Ok(())
    }

    fn carrier_fate(&mut self, _: RunId, _: &CarrierFate) -> Result<()> {
        Ok(())
    }
}

/// Sink that records everything in memory; used by tests and callers
/// that post-process results themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub energy_grids: Vec<(Tick, EnergyLayer, Vec<f64>)>,
    pub site_lists: Vec<(SiteList, Vec<SiteIndex>)>,
    pub carrier_snapshots: Vec<(Tick, Vec<(SiteIndex, CarrierId)>)>,
    pub fates: Vec<CarrierFate>,
}

impl ReportSink for MemorySink {
    fn energy_grid(
        &mut self,
        _run: RunId,
        tick: Tick,
        layer: EnergyLayer,
        values: &[f64],
    ) -> Result<()> {
        self.energy_grids.push((tick, layer, values.to_vec()));
        Ok(())
    }

    fn site_list(&mut self, _run: RunId, list: SiteList, sites: &[SiteIndex]) -> Result<()> {
        self.site_lists.push((list, sites.to_vec()));
        Ok(())
    }

    fn carrier_snapshot(
        &mut self,
        _run: RunId,
        tick: Tick,
        carriers: &[(SiteIndex, CarrierId)],
    ) -> Result<()> {
        self.carrier_snapshots.push((tick, carriers.to_vec()));
        Ok(())
    }

    fn carrier_fate(&mut self, _run: RunId, fate: &CarrierFate) -> Result<()> {
        self.fates.push(*fate);
        Ok(())
    }
}
