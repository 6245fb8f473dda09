//! Shared types used across all Polaron crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The current tick of the simulation.
pub type Tick = u64;

/// Index of a site in the flattened 3-D grid.
///
/// Grid sites occupy `0..volume`; the two electrode pseudo-sites sit at
/// `volume` (source) and `volume + 1` (drain).
pub type SiteIndex = usize;

/// Stable handle for a charge carrier.
///
/// Ids are handed out monotonically by the simulation controller, so the
/// ordering doubles as the deterministic tie-break for contested hops:
/// the carrier with the lower id commits first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CarrierId(pub u64);

impl std::fmt::Display for CarrierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Unique identifier for one simulation run, tagged onto every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a lattice position.
///
/// A site's role never changes after lattice setup. Defect sites are
/// immobile obstacles: carriers neither start there nor hop onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteRole {
    /// Normal transport site.
    Normal,
    /// Defect site — blocks transport.
    Defect,
    /// Source electrode pseudo-site.
    Source,
    /// Drain electrode pseudo-site.
    Drain,
}

impl SiteRole {
    /// Dense index for coupling-matrix lookups.
    pub fn as_index(&self) -> usize {
        match self {
            SiteRole::Normal => 0,
            SiteRole::Defect => 1,
            SiteRole::Source => 2,
            SiteRole::Drain => 3,
        }
    }
}

/// What currently occupies a site.
///
/// Sites hold carrier *handles*, never references — removal of a carrier
/// from the live set can never leave a dangling occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    /// A mobile charge carrier.
    Carrier(CarrierId),
    /// The source electrode.
    Source,
    /// The drain electrode.
    Drain,
}

/// How far a carrier may hop in one attempt, in Manhattan distance
/// over grid coordinates. A range of 1 is the nearest-neighbor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopRange(pub u32);

impl Default for HopRange {
    fn default() -> Self {
        Self(1)
    }
}

/// Outcome of a carrier's commit step for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopOutcome {
    /// The carrier claimed its proposed site and moved.
    Moved,
    /// No proposal, or the proposal was lost to contention.
    Stayed,
    /// The carrier landed on the drain and left the device.
    Absorbed,
}

/// Record emitted for every carrier removed at the drain:
/// when it left, how long it lived, and how far it travelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierFate {
    pub id: CarrierId,
    pub tick: Tick,
    pub lifetime: Tick,
    pub displacement: f64,
}

/// Which per-site energy layer a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyLayer {
    /// Linear bias field.
    Field,
    /// Trap wells.
    Trap,
    /// Pairwise Coulomb interaction of the live carriers.
    Coulomb,
}

impl EnergyLayer {
    /// Short label used in report file names and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            EnergyLayer::Field => "field",
            EnergyLayer::Trap => "trap",
            EnergyLayer::Coulomb => "coulomb",
        }
    }
}

/// Which site classification a site-id list report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteList {
    Defects,
    Traps,
}

impl SiteList {
    pub fn label(&self) -> &'static str {
        match self {
            SiteList::Defects => "defect-ids",
            SiteList::Traps => "trap-ids",
        }
    }
}
