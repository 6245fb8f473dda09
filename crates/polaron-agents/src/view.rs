//! WorldView — the read-only window the propose phase sees.
//!
//! Holding a `WorldView` proves, at the type level, that a caller can
//! only read shared state: it borrows the lattice, the potential field,
//! and the committed occupant snapshot immutably. Commit-phase code
//! needs `&mut Lattice` instead, so the propose/commit read-write split
//! is enforced by the borrow checker rather than by convention.

use polaron_core::lattice::Lattice;
use polaron_core::params::SimulationParameters;
use polaron_core::potential::{acceptance_probability, PotentialField};
use polaron_core::types::SiteIndex;

/// Immutable snapshot of everything a transport decision may read.
pub struct WorldView<'a> {
    lattice: &'a Lattice,
    potential: &'a PotentialField,
    params: &'a SimulationParameters,
    /// Committed carrier positions at the start of the tick.
    occupied: &'a [SiteIndex],
}

impl<'a> WorldView<'a> {
    pub fn new(
        lattice: &'a Lattice,
        potential: &'a PotentialField,
        params: &'a SimulationParameters,
        occupied: &'a [SiteIndex],
    ) -> Self {
        Self {
            lattice,
            potential,
            params,
            occupied,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        self.lattice
    }

    pub fn potential(&self) -> &PotentialField {
        self.potential
    }

    pub fn params(&self) -> &SimulationParameters {
        self.params
    }

    /// Energy change for a proposed hop against the committed snapshot.
    ///
    /// In accelerated mode the controller has already refreshed the
    /// Coulomb layer in bulk this tick, so the cached read suffices;
    /// otherwise the pairwise sum is evaluated on the fly.
    ///
    /// The cache is keyed to carriers: it covers occupied sites and
    /// their hop-range neighborhoods, and the cached destination value
    /// includes the hopper's own pair term. An injection hop starts on
    /// an electrode pseudo-site, which carries no charge and may target
    /// a site outside the cached neighborhoods, so electrode origins
    /// always take the direct path.
    pub fn energy_delta(&self, from: SiteIndex, to: SiteIndex) -> f64 {
        if self.params.accelerated && from < self.lattice.volume() {
            self.potential.energy_delta_cached(self.lattice, from, to)
        } else {
            self.potential.energy_delta(self.lattice, from, to, self.occupied)
        }
    }

    /// Probability of accepting a hop: Metropolis weighting of the
    /// energy delta, scaled by the (from-role, to-role) coupling.
    pub fn hop_probability(&self, from: SiteIndex, to: SiteIndex) -> f64 {
        let delta = self.energy_delta(from, to);
        let metropolis = acceptance_probability(delta, self.params.temperature_kt);
        let coupling =
            self.params.coupling[self.lattice.role(from).as_index()][self.lattice.role(to).as_index()];
        coupling * metropolis
    }
}
