//! Simulation — carrier lifecycle management.
//!
//! The simulation is the device. It owns the lattice, the potential
//! field, the electrodes, and the live carrier set, and drives the
//! tick loop.
//!
//! Each tick:
//! 1. All live carriers propose a hop in parallel against a read-only
//!    view of the committed state
//! 2. Proposals are committed sequentially in ascending carrier-id
//!    order; contested sites go to the lower id
//! 3. Absorbed carriers are retired and their fates recorded
//! 4. The source attempts injections into the first column
//! 5. The tick counter advances

use crate::report::{ReportOptions, ReportSink};
use polaron_agents::carrier::CarrierAgent;
use polaron_agents::drain::DrainAgent;
use polaron_agents::source::SourceAgent;
use polaron_agents::view::WorldView;
use polaron_core::agent::Agent;
use polaron_core::error::{PolaronError, Result};
use polaron_core::lattice::Lattice;
use polaron_core::params::SimulationParameters;
use polaron_core::potential::PotentialField;
use polaron_core::rng::RandomSource;
use polaron_core::types::{
    CarrierFate, CarrierId, EnergyLayer, HopOutcome, Occupant, RunId, SiteIndex, SiteList,
    SiteRole, Tick,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Event emitted by the simulation during a tick.
#[derive(Debug, Clone, Serialize)]
pub enum SimulationEvent {
    /// The source placed a new carrier on the grid.
    Injected { id: CarrierId, site: SiteIndex },
    /// A carrier committed a hop.
    Moved { id: CarrierId, from: SiteIndex, to: SiteIndex },
    /// A carrier reached the drain and left the device.
    Absorbed { id: CarrierId, lifetime: Tick, displacement: f64 },
    /// A tick completed.
    TickComplete { tick: Tick, live: usize, absorbed_this_tick: usize },
}

/// Aggregate counters for a run in progress.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub tick: Tick,
    pub carriers_live: usize,
    pub carriers_injected: u64,
    pub charges_accepted: u64,
    pub defect_sites: usize,
    pub trap_sites: usize,
}

// Propose-phase forks are even stream ids, the injection fork is odd,
// so the two phases can never draw from the same stream. The root
// stream (id 0) is consumed only during setup.
fn carrier_stream(tick: Tick, id: CarrierId) -> u64 {
    (tick.wrapping_shl(20) ^ id.0).wrapping_shl(1)
}

fn injection_stream(tick: Tick) -> u64 {
    tick.wrapping_shl(1) | 1
}

/// The kinetic Monte Carlo transport controller.
pub struct Simulation {
    params: SimulationParameters,
    run_id: RunId,
    lattice: Lattice,
    potential: PotentialField,
    rng: RandomSource,
    carriers: Vec<CarrierAgent>,
    source: SourceAgent,
    drain: DrainAgent,
    defect_sites: Vec<SiteIndex>,
    next_carrier: u64,
    tick: Tick,
    fates: Vec<CarrierFate>,
}

impl Simulation {
    /// Build a device from validated parameters.
    ///
    /// Setup consumes the root random stream in a fixed order (defects,
    /// traps, optional pre-seeded carriers), so two simulations built
    /// from identical parameters are identical down to the site level.
    pub fn new(params: SimulationParameters) -> Result<Self> {
        params.validate()?;

        let mut lattice = Lattice::new(params.grid_width, params.grid_height, params.grid_depth);
        let mut rng = RandomSource::new(params.random_seed);

        let mut defect_sites = Vec::new();
        for site in 0..lattice.volume() {
            if rng.uniform() < params.defect_fraction {
                lattice.set_role(site, SiteRole::Defect)?;
                defect_sites.push(site);
            }
        }

        let mut potential =
            PotentialField::new(&lattice, params.coulomb_prefactor, params.coulomb_cutoff);
        potential.apply_linear_bias(&lattice, params.voltage_source, params.voltage_drain);
        potential.assign_traps(&lattice, params.trap_fraction, params.trap_depth, &mut rng);

        let open_column = |lattice: &Lattice, col: usize| -> Result<Vec<SiteIndex>> {
            Ok(lattice
                .column_sites(col)?
                .into_iter()
                .filter(|&s| lattice.role(s) != SiteRole::Defect)
                .collect())
        };

        let mut source = SourceAgent::new(lattice.source_site());
        source.set_neighbors(open_column(&lattice, 0)?);
        source.set_max_carriers(params.max_carriers());

        let mut drain = DrainAgent::new(lattice.drain_site());
        drain.set_neighbors(open_column(&lattice, params.grid_width - 1)?);

        let mut simulation = Self {
            run_id: RunId::new(),
            lattice,
            potential,
            rng,
            carriers: Vec::new(),
            source,
            drain,
            defect_sites,
            next_carrier: 0,
            tick: 0,
            fates: Vec::new(),
            params,
        };

        if simulation.params.seed_charges {
            simulation.seed_initial_charges();
        }
        if simulation.params.accelerated {
            let occupied = simulation.lattice.occupied_sites();
            simulation.potential.update_interaction_energies(
                &simulation.lattice,
                &occupied,
                simulation.params.hop_range,
            )?;
        }

        info!(
            run = %simulation.run_id,
            volume = simulation.lattice.volume(),
            defects = simulation.defect_sites.len(),
            traps = simulation.potential.trap_sites().len(),
            seeded = simulation.carriers.len(),
            "simulation constructed"
        );
        Ok(simulation)
    }

    /// Scatter carriers uniformly over open sites up to the carrier cap.
    /// Attempts are bounded so a crowded grid cannot spin forever.
    fn seed_initial_charges(&mut self) {
        let target = self.source.max_carriers();
        let mut attempts = target.saturating_mul(4);
        while self.carriers.len() < target && attempts > 0 {
            attempts -= 1;
            let site = self.rng.index(self.lattice.volume());
            if !self.lattice.is_open(site) {
                continue;
            }
            let id = self.allocate_carrier(site);
            debug!(carrier = %id, site, "pre-seeded carrier");
        }
    }

    fn allocate_carrier(&mut self, site: SiteIndex) -> CarrierId {
        let id = CarrierId(self.next_carrier);
        self.next_carrier += 1;
        self.lattice.set_occupant(site, Occupant::Carrier(id));
        self.carriers.push(CarrierAgent::new(id, site));
        self.source.increment_charge();
        id
    }

    /// Place a carrier on a specific open site, bypassing the source's
    /// stochastic acceptance. The carrier still counts against the
    /// outstanding cap.
    pub fn place_carrier(&mut self, site: SiteIndex) -> Result<CarrierId> {
        if site >= self.lattice.volume() {
            return Err(PolaronError::site_out_of_range(site, self.lattice.volume()));
        }
        if !self.lattice.is_open(site) {
            return Err(PolaronError::invalid_config(
                "carrier_site",
                site.to_string(),
                "site is a defect or already occupied",
            ));
        }
        Ok(self.allocate_carrier(site))
    }

    /// Advance the device by one tick and return everything that
    /// happened, ending with a `TickComplete` marker.
    pub fn tick(&mut self) -> Result<Vec<SimulationEvent>> {
        let tick = self.tick + 1;
        let occupied = self.lattice.occupied_sites();

        if self.params.accelerated {
            self.potential.update_interaction_energies(
                &self.lattice,
                &occupied,
                self.params.hop_range,
            )?;
        }

        // Propose: each carrier draws from its own (tick, id) fork, so
        // the outcome is independent of how rayon schedules the map.
        {
            let lattice = &self.lattice;
            let potential = &self.potential;
            let params = &self.params;
            let rng = &self.rng;
            let view = WorldView::new(lattice, potential, params, &occupied);
            self.carriers.par_iter_mut().try_for_each(|carrier| {
                let mut fork = rng.fork(carrier_stream(tick, carrier.id()));
                carrier.propose_future(&view, &mut fork)
            })?;
        }

        // Commit: carriers are stored in ascending id order, so walking
        // the vector resolves contention toward the lower id.
        let mut events = Vec::new();
        let mut absorbed_this_tick = 0;
        for carrier in self.carriers.iter_mut() {
            let from = carrier.site();
            match carrier.complete_tick(&mut self.lattice) {
                HopOutcome::Stayed => {}
                HopOutcome::Moved => {
                    events.push(SimulationEvent::Moved {
                        id: carrier.id(),
                        from,
                        to: carrier.site(),
                    });
                }
                HopOutcome::Absorbed => {
                    self.drain.accept_charge(-1);
                    self.source.decrement_charge();
                    let fate = carrier.fate(tick);
                    self.fates.push(fate);
                    events.push(SimulationEvent::Absorbed {
                        id: fate.id,
                        lifetime: fate.lifetime,
                        displacement: fate.displacement,
                    });
                    absorbed_this_tick += 1;
                }
            }
        }
        self.carriers.retain(|c| !c.removed());

        // Inject: one attempt at a time against the freshly committed
        // occupancy, so two attempts can never claim the same site.
        let attempts = match self.params.source_attempts {
            Some(n) => n as usize,
            None => self
                .source
                .max_carriers()
                .saturating_sub(self.source.outstanding()),
        };
        let mut injection_rng = self.rng.fork(injection_stream(tick));
        for _ in 0..attempts {
            let occupied = self.lattice.occupied_sites();
            let target = {
                let view =
                    WorldView::new(&self.lattice, &self.potential, &self.params, &occupied);
                self.source.transport(&view, &mut injection_rng)
            };
            let Some(site) = target else { continue };
            // transport() already counted the injection; register the
            // carrier without touching the source counters again.
            let id = CarrierId(self.next_carrier);
            self.next_carrier += 1;
            self.lattice.set_occupant(site, Occupant::Carrier(id));
            self.carriers.push(CarrierAgent::new(id, site));
            events.push(SimulationEvent::Injected { id, site });
        }

        self.tick = tick;
        debug!(
            tick,
            live = self.carriers.len(),
            absorbed = absorbed_this_tick,
            "tick complete"
        );
        events.push(SimulationEvent::TickComplete {
            tick,
            live: self.carriers.len(),
            absorbed_this_tick,
        });
        Ok(events)
    }

    /// Run for `ticks` ticks, discarding events.
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Run for `ticks` ticks, streaming the selected reports to `sink`.
    ///
    /// Setup-time layers (bias, traps) and site lists go out before the
    /// first tick; absorption records stream as they happen; the Coulomb
    /// layer and the carrier snapshot describe the final state.
    pub fn run_with_sink<S: ReportSink>(
        &mut self,
        ticks: u64,
        sink: &mut S,
        options: &ReportOptions,
    ) -> Result<()> {
        let run = self.run_id;
        if options.field_energy {
            sink.energy_grid(
                run,
                self.tick,
                EnergyLayer::Field,
                self.potential.bias_grid(&self.lattice),
            )?;
        }
        if options.trap_energy {
            sink.energy_grid(
                run,
                self.tick,
                EnergyLayer::Trap,
                self.potential.trap_grid(&self.lattice),
            )?;
        }
        if options.defect_ids {
            sink.site_list(run, SiteList::Defects, &self.defect_sites)?;
        }
        if options.trap_ids {
            sink.site_list(run, SiteList::Traps, self.potential.trap_sites())?;
        }

        for _ in 0..ticks {
            let fates_before = self.fates.len();
            self.tick()?;
            if options.carrier_stats {
                for i in fates_before..self.fates.len() {
                    let fate = self.fates[i];
                    sink.carrier_fate(run, &fate)?;
                }
            }
        }

        if options.coulomb_energy {
            let occupied = self.lattice.occupied_sites();
            let grid = self.potential.coulomb_energy_grid(&self.lattice, &occupied);
            sink.energy_grid(run, self.tick, EnergyLayer::Coulomb, &grid)?;
        }
        if options.carrier_positions {
            sink.carrier_snapshot(run, self.tick, &self.carrier_snapshot())?;
        }
        Ok(())
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn potential(&self) -> &PotentialField {
        &self.potential
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Carriers currently on the grid.
    pub fn live_carriers(&self) -> usize {
        self.carriers.len()
    }

    /// Lifetime count of carriers placed on the grid, injected or seeded.
    pub fn total_injected(&self) -> u64 {
        self.source.total_injected()
    }

    /// Total charges absorbed at the drain. Never decreases.
    pub fn charges_accepted(&self) -> u64 {
        self.drain.accepted_charges()
    }

    /// Sites classified as defects at setup, in site order.
    pub fn defect_sites(&self) -> &[SiteIndex] {
        &self.defect_sites
    }

    /// Absorption records accumulated so far, in absorption order.
    pub fn fates(&self) -> &[CarrierFate] {
        &self.fates
    }

    /// Live carriers as (site, id), in carrier-id order.
    pub fn carrier_snapshot(&self) -> Vec<(SiteIndex, CarrierId)> {
        self.carriers.iter().map(|c| (c.site(), c.id())).collect()
    }

    /// Aggregate counters for reporting.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            tick: self.tick,
            carriers_live: self.carriers.len(),
            carriers_injected: self.source.total_injected(),
            charges_accepted: self.drain.accepted_charges(),
            defect_sites: self.defect_sites.len(),
            trap_sites: self.potential.trap_sites().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> SimulationParameters {
        SimulationParameters {
            grid_width: 8,
            grid_height: 4,
            grid_depth: 1,
            charge_fraction: 0.25,
            random_seed: 17,
            ..Default::default()
        }
    }

    #[test]
    fn construction_respects_fractions() {
        let params = SimulationParameters {
            defect_fraction: 0.5,
            trap_fraction: 0.5,
            grid_width: 20,
            grid_height: 20,
            grid_depth: 1,
            ..Default::default()
        };
        let sim = Simulation::new(params).unwrap();
        assert!(!sim.defect_sites().is_empty());
        assert!(!sim.potential().trap_sites().is_empty());
        // Defects never appear in the electrode neighbor lists.
        for &site in sim.defect_sites() {
            assert_eq!(sim.lattice().role(site), SiteRole::Defect);
        }
    }

    #[test]
    fn invalid_parameters_are_rejected_before_setup() {
        let params = SimulationParameters {
            grid_width: 0,
            ..Default::default()
        };
        assert!(Simulation::new(params).is_err());
    }

    #[test]
    fn place_carrier_rejects_blocked_sites() {
        let mut sim = Simulation::new(small_params()).unwrap();
        let site = sim.lattice().site_index(3, 1, 0).unwrap();
        let first = sim.place_carrier(site).unwrap();
        assert_eq!(sim.live_carriers(), 1);
        let second = sim.place_carrier(site);
        assert!(second.is_err());
        assert_eq!(sim.carrier_snapshot(), vec![(site, first)]);
    }

    #[test]
    fn ticks_advance_and_emit_completion_markers() {
        let mut sim = Simulation::new(small_params()).unwrap();
        for expected in 1..=5 {
            let events = sim.tick().unwrap();
            match events.last() {
                Some(SimulationEvent::TickComplete { tick, .. }) => assert_eq!(*tick, expected),
                other => panic!("expected TickComplete, got {:?}", other),
            }
        }
        assert_eq!(sim.current_tick(), 5);
    }

    #[test]
    fn injection_never_exceeds_the_carrier_cap() {
        let mut sim = Simulation::new(small_params()).unwrap();
        let cap = sim.params().max_carriers();
        sim.run(50).unwrap();
        assert!(sim.live_carriers() <= cap, "{} > {}", sim.live_carriers(), cap);
    }

    #[test]
    fn stats_mirror_the_counters() {
        let mut sim = Simulation::new(small_params()).unwrap();
        sim.run(10).unwrap();
        let stats = sim.stats();
        assert_eq!(stats.tick, 10);
        assert_eq!(stats.carriers_live, sim.live_carriers());
        assert_eq!(stats.carriers_injected, sim.total_injected());
        assert_eq!(stats.charges_accepted, sim.charges_accepted());
    }

    #[test]
    fn seeded_runs_start_populated() {
        let params = SimulationParameters {
            seed_charges: true,
            ..small_params()
        };
        let sim = Simulation::new(params).unwrap();
        assert!(sim.live_carriers() > 0);
        assert!(sim.live_carriers() <= sim.params().max_carriers());
        assert_eq!(sim.total_injected(), sim.live_carriers() as u64);
    }
}
