//! SourceAgent — injects carriers at the source electrode.
//!
//! The source sits on its pseudo-site past the grid and owns the
//! first-column neighbor list computed at construction (defect sites
//! removed). Injection uses the same stochastic-acceptance rule as a
//! carrier hop. The outstanding-carrier cap is tracked with counters,
//! never by scanning the lattice.

use crate::view::WorldView;
use polaron_core::agent::Agent;
use polaron_core::rng::RandomSource;
use polaron_core::types::{SiteIndex, SiteRole};

/// The injection electrode.
pub struct SourceAgent {
    site: SiteIndex,
    neighbors: Vec<SiteIndex>,
    max_carriers: usize,
    outstanding: usize,
    total_injected: u64,
}

impl SourceAgent {
    pub fn new(site: SiteIndex) -> Self {
        Self {
            site,
            neighbors: Vec::new(),
            max_carriers: 0,
            outstanding: 0,
            total_injected: 0,
        }
    }

    /// Register the boundary-column sites this source can inject into.
    pub fn set_neighbors(&mut self, neighbors: Vec<SiteIndex>) {
        self.neighbors = neighbors;
    }

    pub fn neighbors(&self) -> &[SiteIndex] {
        &self.neighbors
    }

    /// Cap on concurrently outstanding carriers from this source.
    pub fn set_max_carriers(&mut self, max: usize) {
        self.max_carriers = max;
    }

    pub fn max_carriers(&self) -> usize {
        self.max_carriers
    }

    /// Carriers currently alive that this source introduced.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Lifetime count of successful injections.
    pub fn total_injected(&self) -> u64 {
        self.total_injected
    }

    /// Record a carrier entering the device (also used when carriers
    /// are pre-seeded onto the grid).
    pub fn increment_charge(&mut self) {
        self.outstanding += 1;
        self.total_injected += 1;
    }

    /// Record a carrier leaving the device at the drain.
    pub fn decrement_charge(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    /// One injection attempt. Returns the claimed target site, or
    /// `None` when saturated, when the drawn neighbor is blocked, or
    /// when the stochastic acceptance rejects the attempt — all routine
    /// conditions, never errors.
    pub fn transport(&mut self, view: &WorldView<'_>, rng: &mut RandomSource) -> Option<SiteIndex> {
        if self.outstanding >= self.max_carriers || self.neighbors.is_empty() {
            return None;
        }

        let to = self.neighbors[rng.index(self.neighbors.len())];
        if !view.lattice().is_open(to) {
            return None;
        }
        if !rng.chance(view.hop_probability(self.site, to)) {
            return None;
        }

        self.increment_charge();
        Some(to)
    }
}

impl Agent for SourceAgent {
    fn site(&self) -> SiteIndex {
        self.site
    }

    fn role(&self) -> SiteRole {
        SiteRole::Source
    }

    fn accept_charge(&mut self, _charge: i32) -> bool {
        // Carriers never flow back into the source.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaron_core::lattice::Lattice;
    use polaron_core::params::SimulationParameters;
    use polaron_core::potential::PotentialField;
    use polaron_core::types::{CarrierId, Occupant};

    fn world(width: usize, height: usize) -> (Lattice, PotentialField, SimulationParameters) {
        let params = SimulationParameters {
            grid_width: width,
            grid_height: height,
            grid_depth: 1,
            ..Default::default()
        };
        let lattice = Lattice::new(width, height, 1);
        let mut potential =
            PotentialField::new(&lattice, params.coulomb_prefactor, params.coulomb_cutoff);
        potential.apply_linear_bias(&lattice, params.voltage_source, params.voltage_drain);
        (lattice, potential, params)
    }

    #[test]
    fn saturation_silently_yields_no_injection() {
        let (lattice, potential, params) = world(4, 4);
        let mut source = SourceAgent::new(lattice.source_site());
        source.set_neighbors(lattice.column_sites(0).unwrap());
        source.set_max_carriers(1);
        source.increment_charge();

        let view = WorldView::new(&lattice, &potential, &params, &[]);
        let mut rng = RandomSource::new(9);
        for _ in 0..50 {
            assert_eq!(source.transport(&view, &mut rng), None);
        }
        assert_eq!(source.total_injected(), 1);
    }

    #[test]
    fn injection_targets_come_from_the_first_column() {
        let (lattice, potential, params) = world(6, 6);
        let mut source = SourceAgent::new(lattice.source_site());
        source.set_neighbors(lattice.column_sites(0).unwrap());
        source.set_max_carriers(100);

        let view = WorldView::new(&lattice, &potential, &params, &[]);
        let mut rng = RandomSource::new(2);
        let mut injected = 0;
        for _ in 0..100 {
            if let Some(site) = source.transport(&view, &mut rng) {
                assert_eq!(lattice.column_of(site), 0);
                injected += 1;
            }
        }
        assert!(injected > 0);
        assert_eq!(source.total_injected(), injected);
    }

    #[test]
    fn occupied_target_blocks_the_attempt() {
        let (mut lattice, potential, params) = world(3, 1);
        // Single first-column site, already occupied.
        let target = lattice.site_index(0, 0, 0).unwrap();
        lattice.set_occupant(target, Occupant::Carrier(CarrierId(0)));

        let mut source = SourceAgent::new(lattice.source_site());
        source.set_neighbors(vec![target]);
        source.set_max_carriers(10);

        let occupied = [target];
        let view = WorldView::new(&lattice, &potential, &params, &occupied);
        let mut rng = RandomSource::new(4);
        for _ in 0..20 {
            assert_eq!(source.transport(&view, &mut rng), None);
        }
    }

    #[test]
    fn outstanding_counter_tracks_increment_and_decrement() {
        let mut source = SourceAgent::new(9);
        source.set_max_carriers(5);
        source.increment_charge();
        source.increment_charge();
        assert_eq!(source.outstanding(), 2);
        source.decrement_charge();
        assert_eq!(source.outstanding(), 1);
        source.decrement_charge();
        source.decrement_charge();
        assert_eq!(source.outstanding(), 0);
    }
}
