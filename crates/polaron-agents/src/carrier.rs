//! CarrierAgent — a mobile charge with a two-phase hop state machine.
//!
//! Resident → Proposed → (Moved | Rejected | Absorbed). The propose
//! step reads shared state and writes only this carrier's `future_site`,
//! so the controller can run it for every live carrier in parallel. The
//! commit step claims the destination under exclusive lattice access;
//! contention is settled by the controller walking carriers in ascending
//! id order, so the lower id always wins a contested site.

use crate::view::WorldView;
use polaron_core::agent::Agent;
use polaron_core::error::Result;
use polaron_core::lattice::Lattice;
use polaron_core::rng::RandomSource;
use polaron_core::types::{CarrierFate, CarrierId, HopOutcome, Occupant, SiteIndex, SiteRole, Tick};

/// A mobile charge carrier. Born at injection, removed at the drain.
pub struct CarrierAgent {
    id: CarrierId,
    site: SiteIndex,
    /// Candidate destination, present only between propose and commit.
    future_site: Option<SiteIndex>,
    lifetime: Tick,
    distance: f64,
    removed: bool,
}

impl CarrierAgent {
    pub fn new(id: CarrierId, site: SiteIndex) -> Self {
        Self {
            id,
            site,
            future_site: None,
            lifetime: 0,
            distance: 0.0,
            removed: false,
        }
    }

    pub fn id(&self) -> CarrierId {
        self.id
    }

    /// Pending proposal, if any (transient between phases).
    pub fn future_site(&self) -> Option<SiteIndex> {
        self.future_site
    }

    /// Ticks spent in motion (hops committed, including the final hop
    /// into the drain).
    pub fn lifetime(&self) -> Tick {
        self.lifetime
    }

    /// Cumulative Euclidean path length in lattice units.
    pub fn distance_traveled(&self) -> f64 {
        self.distance
    }

    /// Set once the carrier lands on the drain.
    pub fn removed(&self) -> bool {
        self.removed
    }

    /// Final bookkeeping record for an absorbed carrier.
    pub fn fate(&self, tick: Tick) -> CarrierFate {
        CarrierFate {
            id: self.id,
            tick,
            lifetime: self.lifetime,
            displacement: self.distance,
        }
    }

    /// Propose phase: pick one open neighbor (the drain is always open
    /// to carriers) uniformly at random and accept it with the
    /// Metropolis-weighted hop probability. Reads shared state only;
    /// mutates nothing but this carrier's own proposal slot.
    pub fn propose_future(&mut self, view: &WorldView<'_>, rng: &mut RandomSource) -> Result<()> {
        self.future_site = None;

        let lattice = view.lattice();
        let neighbors = lattice.neighbors_of(self.site, view.params().hop_range)?;
        let candidates: Vec<SiteIndex> = neighbors
            .into_iter()
            .filter(|&n| n == lattice.drain_site() || lattice.is_open(n))
            .collect();
        if candidates.is_empty() {
            return Ok(());
        }

        let to = candidates[rng.index(candidates.len())];
        if rng.chance(view.hop_probability(self.site, to)) {
            self.future_site = Some(to);
        }
        Ok(())
    }

    /// Commit phase: claim the proposed destination if it is still
    /// available. Runs under exclusive lattice access; a destination
    /// taken earlier this tick (by a lower-id carrier) leaves this
    /// carrier Resident for the tick.
    pub fn complete_tick(&mut self, lattice: &mut Lattice) -> HopOutcome {
        let Some(to) = self.future_site.take() else {
            return HopOutcome::Stayed;
        };

        if to == lattice.drain_site() {
            self.distance += lattice.distance_between(self.site, to);
            self.lifetime += 1;
            self.removed = true;
            lattice.clear_occupant(self.site);
            return HopOutcome::Absorbed;
        }

        if !lattice.is_open(to) {
            // Lost the claim; stay resident this tick.
            return HopOutcome::Stayed;
        }

        lattice.clear_occupant(self.site);
        lattice.set_occupant(to, Occupant::Carrier(self.id));
        self.distance += lattice.distance_between(self.site, to);
        self.site = to;
        self.lifetime += 1;
        HopOutcome::Moved
    }
}

impl Agent for CarrierAgent {
    fn site(&self) -> SiteIndex {
        self.site
    }

    fn role(&self) -> SiteRole {
        SiteRole::Normal
    }

    fn accept_charge(&mut self, _charge: i32) -> bool {
        // An occupied site hosts nothing further.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaron_core::params::SimulationParameters;
    use polaron_core::potential::PotentialField;

    fn small_world() -> (Lattice, PotentialField, SimulationParameters) {
        let params = SimulationParameters {
            grid_width: 3,
            grid_height: 3,
            grid_depth: 1,
            ..Default::default()
        };
        let lattice = Lattice::new(3, 3, 1);
        let mut potential = PotentialField::new(&lattice, params.coulomb_prefactor, params.coulomb_cutoff);
        potential.apply_linear_bias(&lattice, params.voltage_source, params.voltage_drain);
        (lattice, potential, params)
    }

    #[test]
    fn proposal_is_transient() {
        let (mut lattice, potential, params) = small_world();
        let center = lattice.site_index(1, 1, 0).unwrap();
        let mut carrier = CarrierAgent::new(CarrierId(0), center);
        lattice.set_occupant(center, Occupant::Carrier(carrier.id()));

        let occupied = [center];
        let view = WorldView::new(&lattice, &potential, &params, &occupied);
        carrier.propose_future(&view, &mut RandomSource::new(5)).unwrap();
        let proposed = carrier.future_site();
        carrier.complete_tick(&mut lattice);
        assert_eq!(carrier.future_site(), None);
        if proposed.is_some() {
            assert_eq!(carrier.lifetime(), 1);
        } else {
            assert_eq!(carrier.lifetime(), 0);
        }
    }

    #[test]
    fn zero_bias_single_tick_moves_to_one_neighbor_or_stays() {
        let params = SimulationParameters {
            grid_width: 3,
            grid_height: 3,
            grid_depth: 1,
            voltage_source: 0.0,
            voltage_drain: 0.0,
            ..Default::default()
        };
        let mut lattice = Lattice::new(3, 3, 1);
        let potential = PotentialField::new(&lattice, params.coulomb_prefactor, params.coulomb_cutoff);
        let center = lattice.site_index(1, 1, 0).unwrap();
        let mut carrier = CarrierAgent::new(CarrierId(0), center);
        lattice.set_occupant(center, Occupant::Carrier(carrier.id()));
        let neighbors = lattice.neighbors_of(center, params.hop_range).unwrap();

        let occupied = [center];
        let view = WorldView::new(&lattice, &potential, &params, &occupied);
        let mut rng = RandomSource::new(3);
        carrier.propose_future(&view, &mut rng).unwrap();
        match carrier.complete_tick(&mut lattice) {
            HopOutcome::Moved => {
                assert!(neighbors.contains(&carrier.site()));
                assert_eq!(carrier.lifetime(), 1);
            }
            HopOutcome::Stayed => {
                assert_eq!(carrier.site(), center);
                assert_eq!(carrier.lifetime(), 0);
            }
            HopOutcome::Absorbed => panic!("no drain adjacency from the center of a 3x3 grid"),
        }
    }

    #[test]
    fn occupied_and_defect_neighbors_are_never_proposed() {
        let (mut lattice, potential, params) = small_world();
        let center = lattice.site_index(1, 1, 0).unwrap();
        let mut carrier = CarrierAgent::new(CarrierId(0), center);
        lattice.set_occupant(center, Occupant::Carrier(carrier.id()));

        // Wall the carrier in: everything around it blocked.
        for n in lattice.neighbors_of(center, params.hop_range).unwrap() {
            if n < lattice.volume() {
                lattice.set_role(n, SiteRole::Defect).unwrap();
            }
        }

        let occupied = [center];
        let view = WorldView::new(&lattice, &potential, &params, &occupied);
        for draw in 0..32 {
            let mut rng = RandomSource::new(draw);
            carrier.propose_future(&view, &mut rng).unwrap();
            assert_eq!(carrier.future_site(), None);
        }
    }

    #[test]
    fn absorption_captures_lifetime_and_displacement() {
        let (mut lattice, potential, params) = small_world();
        let edge = lattice.site_index(2, 1, 0).unwrap();
        let mut carrier = CarrierAgent::new(CarrierId(4), edge);
        lattice.set_occupant(edge, Occupant::Carrier(carrier.id()));

        // Force the proposal to the drain.
        let occupied = [edge];
        let view = WorldView::new(&lattice, &potential, &params, &occupied);
        let mut rng = RandomSource::new(0);
        let mut absorbed = false;
        for _ in 0..200 {
            carrier.propose_future(&view, &mut rng).unwrap();
            if carrier.future_site() == Some(lattice.drain_site()) {
                assert_eq!(carrier.complete_tick(&mut lattice), HopOutcome::Absorbed);
                absorbed = true;
                break;
            }
        }
        assert!(absorbed, "drain hop never proposed across 200 draws");
        assert!(carrier.removed());
        assert_eq!(carrier.lifetime(), 1);
        assert_eq!(carrier.distance_traveled(), 1.0);
        assert_eq!(lattice.occupant(edge), None);
    }
}
