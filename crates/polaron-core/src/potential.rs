//! PotentialField — per-site energy split into three layers.
//!
//! Every site's potential is the sum of a linear bias layer (a function
//! of the column axis only), a trap layer assigned once at setup, and a
//! pairwise Coulomb layer over the committed carrier positions. The
//! Coulomb layer is the hot path: refreshing it is O(n²) over live
//! carriers, which is why the controller can batch it into one bulk
//! recomputation per tick instead of evaluating pairs on the fly.

use crate::error::Result;
use crate::lattice::Lattice;
use crate::rng::RandomSource;
use crate::types::{HopRange, SiteIndex};

/// Metropolis acceptance probability for a hop with energy change
/// `delta_e` at thermal energy `kt`. Always in (0, 1]; a downhill or
/// level hop is accepted with probability 1.
pub fn acceptance_probability(delta_e: f64, kt: f64) -> f64 {
    if delta_e <= 0.0 {
        1.0
    } else {
        (-delta_e / kt).exp()
    }
}

/// Per-site scalar potential, decomposed into independently updatable
/// bias, trap, and Coulomb layers.
pub struct PotentialField {
    bias: Vec<f64>,
    trap: Vec<f64>,
    coulomb: Vec<f64>,
    trap_sites: Vec<SiteIndex>,
    prefactor: f64,
    cutoff: f64,
}

impl PotentialField {
    /// Create a zeroed field covering the grid and both electrodes.
    pub fn new(lattice: &Lattice, prefactor: f64, cutoff: f64) -> Self {
        let n = lattice.total_sites();
        Self {
            bias: vec![0.0; n],
            trap: vec![0.0; n],
            coulomb: vec![0.0; n],
            trap_sites: Vec::new(),
            prefactor,
            cutoff,
        }
    }

    /// Zero every layer and forget trap assignments.
    pub fn zero(&mut self) {
        self.bias.iter_mut().for_each(|v| *v = 0.0);
        self.trap.iter_mut().for_each(|v| *v = 0.0);
        self.coulomb.iter_mut().for_each(|v| *v = 0.0);
        self.trap_sites.clear();
    }

    /// Linear bias interpolated between the electrode voltages along
    /// the column axis. Electrode pseudo-sites are held at the bare
    /// voltages.
    pub fn apply_linear_bias(&mut self, lattice: &Lattice, v_source: f64, v_drain: f64) {
        let width = lattice.width() as f64;
        for site in 0..lattice.volume() {
            let x = (lattice.column_of(site) as f64 + 0.5) / width;
            self.bias[site] = v_source + (v_drain - v_source) * x;
        }
        self.bias[lattice.source_site()] = v_source;
        self.bias[lattice.drain_site()] = v_drain;
    }

    /// Assign trap wells to a random fraction of grid sites, each at a
    /// fixed `depth`. Idempotent across runs with the same seed stream.
    pub fn assign_traps(
        &mut self,
        lattice: &Lattice,
        fraction: f64,
        depth: f64,
        rng: &mut RandomSource,
    ) {
        for site in 0..lattice.volume() {
            if rng.uniform() < fraction {
                self.trap[site] += depth;
                self.trap_sites.push(site);
            }
        }
    }

    /// Sites carrying a trap well, in site order.
    pub fn trap_sites(&self) -> &[SiteIndex] {
        &self.trap_sites
    }

    /// Total potential at a site: bias + trap + cached Coulomb.
    pub fn potential_at(&self, site: SiteIndex) -> f64 {
        self.bias[site] + self.trap[site] + self.coulomb[site]
    }

    /// Bias + trap only; the layers fixed at setup.
    pub fn static_potential_at(&self, site: SiteIndex) -> f64 {
        self.bias[site] + self.trap[site]
    }

    fn pair_energy(&self, lattice: &Lattice, a: SiteIndex, b: SiteIndex) -> f64 {
        let r = lattice.distance_between(a, b);
        if r <= 0.0 || r > self.cutoff {
            0.0
        } else {
            self.prefactor / r
        }
    }

    /// Coulomb energy a carrier would feel at `site`, from every
    /// committed carrier except the one at `exclude` (the hopper's own
    /// current position). Electrode pseudo-sites are screened to zero.
    pub fn coulomb_at(
        &self,
        lattice: &Lattice,
        site: SiteIndex,
        occupied: &[SiteIndex],
        exclude: SiteIndex,
    ) -> f64 {
        if site >= lattice.volume() {
            return 0.0;
        }
        occupied
            .iter()
            .filter(|&&s| s != exclude && s != site)
            .map(|&s| self.pair_energy(lattice, site, s))
            .sum()
    }

    /// Refresh the cached Coulomb layer from the committed carrier
    /// positions: the bulk O(n²) pass of accelerated mode.
    ///
    /// The cache covers every occupied site (contributions from the
    /// *other* carriers) and every open site within `hop_range` of one
    /// (contributions from all carriers except any that would be the
    /// hopper itself, handled by `energy_delta_cached`).
    pub fn update_interaction_energies(
        &mut self,
        lattice: &Lattice,
        occupied: &[SiteIndex],
        hop_range: HopRange,
    ) -> Result<()> {
        self.coulomb.iter_mut().for_each(|v| *v = 0.0);

        let mut targets: Vec<SiteIndex> = occupied.to_vec();
        for &site in occupied {
            for n in lattice.neighbors_of(site, hop_range)? {
                if n < lattice.volume() {
                    targets.push(n);
                }
            }
        }
        targets.sort_unstable();
        targets.dedup();

        for &source in occupied {
            for &target in &targets {
                if target != source {
                    self.coulomb[target] += self.pair_energy(lattice, source, target);
                }
            }
        }
        Ok(())
    }

    /// Energy change for a proposed hop, with the Coulomb contribution
    /// computed directly from the committed occupant snapshot.
    pub fn energy_delta(
        &self,
        lattice: &Lattice,
        from: SiteIndex,
        to: SiteIndex,
        occupied: &[SiteIndex],
    ) -> f64 {
        let static_delta = self.static_potential_at(to) - self.static_potential_at(from);
        let coulomb_to = self.coulomb_at(lattice, to, occupied, from);
        let coulomb_from = self.coulomb_at(lattice, from, occupied, from);
        static_delta + coulomb_to - coulomb_from
    }

    /// Energy change for a proposed hop, reading the cached Coulomb
    /// layer refreshed by `update_interaction_energies`. The cached
    /// value at the destination still includes the hopper's own charge,
    /// so that one pair term is subtracted here.
    ///
    /// `from` must be an occupied grid site: the cache holds nothing
    /// for electrode pseudo-sites, and the self-term subtraction only
    /// makes sense when the hopper's charge is on the grid. Hops out of
    /// an electrode go through [`PotentialField::energy_delta`].
    pub fn energy_delta_cached(&self, lattice: &Lattice, from: SiteIndex, to: SiteIndex) -> f64 {
        let static_delta = self.static_potential_at(to) - self.static_potential_at(from);
        let coulomb_to = if to >= lattice.volume() {
            0.0
        } else {
            self.coulomb[to] - self.pair_energy(lattice, from, to)
        };
        static_delta + coulomb_to - self.coulomb[from]
    }

    /// Snapshot of the bias layer over the grid, for reporting.
    pub fn bias_grid(&self, lattice: &Lattice) -> &[f64] {
        &self.bias[..lattice.volume()]
    }

    /// Snapshot of the trap layer over the grid, for reporting.
    pub fn trap_grid(&self, lattice: &Lattice) -> &[f64] {
        &self.trap[..lattice.volume()]
    }

    /// Full-grid Coulomb energy from the committed carrier positions,
    /// computed fresh for reporting. O(volume × carriers).
    pub fn coulomb_energy_grid(&self, lattice: &Lattice, occupied: &[SiteIndex]) -> Vec<f64> {
        (0..lattice.volume())
            .map(|site| {
                occupied
                    .iter()
                    .filter(|&&s| s != site)
                    .map(|&s| self.pair_energy(lattice, site, s))
                    .sum()
            })
            .collect()
    }
}
