//! # Polaron
//!
//! Kinetic Monte Carlo simulation of charge-carrier transport through a
//! disordered 3-D lattice.
//!
//! A device is a grid of sites between two electrodes. Carriers enter at
//! the source, hop site to site under a Metropolis acceptance rule over
//! a potential landscape of linear bias, trap wells, and carrier-carrier
//! Coulomb repulsion, and leave at the drain. Every run is fully
//! deterministic under its seed.
//!
//! ## Quick Start
//!
//! ```rust
//! use polaron::prelude::*;
//!
//! let params = SimulationParameters {
//!     grid_width: 16,
//!     grid_height: 8,
//!     grid_depth: 1,
//!     voltage_drain: -2.0,
//!     random_seed: 42,
//!     ..Default::default()
//! };
//!
//! let mut simulation = Simulation::new(params).unwrap();
//! simulation.run(200).unwrap();
//!
//! let report = metrics::compute(&simulation);
//! assert_eq!(report.throughput.charges_accepted, simulation.charges_accepted());
//! ```
//!
//! ## Architecture
//!
//! Polaron is organized into several crates:
//!
//! - [`polaron_core`] - Lattice, potential field, parameters, random streams
//! - [`polaron_agents`] - Carrier, source, and drain agents
//! - [`polaron_runtime`] - Tick controller, reporting contract, metrics
//!
//! ## Key Concepts
//!
//! ### The tick loop
//!
//! Each tick runs in two phases. Every live carrier first *proposes* a
//! hop in parallel against a read-only view of the committed state, then
//! proposals are *committed* sequentially in ascending carrier-id order,
//! so a contested site always goes to the lower id and the outcome never
//! depends on thread scheduling.
//!
//! ### The potential landscape
//!
//! Site energy is the sum of three layers: a linear bias between the
//! electrode voltages, trap wells assigned to a random fraction of sites
//! at setup, and pairwise Coulomb repulsion over the live carriers. The
//! Coulomb layer can be evaluated per proposal or batched into one bulk
//! refresh per tick (`accelerated` mode).
//!
//! ### Determinism
//!
//! All randomness flows from one seed through forkable streams keyed by
//! (tick, carrier id). Two runs with identical parameters produce
//! identical event streams, regardless of thread count.

// Re-export all subcrates
pub use polaron_agents as agents;
pub use polaron_core as core;
pub use polaron_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use polaron::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use polaron_core::types::{
        CarrierFate, CarrierId, EnergyLayer, HopOutcome, HopRange, Occupant, RunId, SiteIndex,
        SiteList, SiteRole, Tick,
    };

    // Core model
    pub use polaron_core::agent::Agent;
    pub use polaron_core::error::{PolaronError, Result};
    pub use polaron_core::lattice::Lattice;
    pub use polaron_core::params::{CouplingMatrix, SimulationParameters};
    pub use polaron_core::potential::{acceptance_probability, PotentialField};
    pub use polaron_core::rng::RandomSource;

    // Agents
    pub use polaron_agents::carrier::CarrierAgent;
    pub use polaron_agents::drain::DrainAgent;
    pub use polaron_agents::source::SourceAgent;
    pub use polaron_agents::view::WorldView;

    // Runtime
    pub use polaron_runtime::metrics::{self, TransportMetrics};
    pub use polaron_runtime::report::{MemorySink, NullSink, ReportOptions, ReportSink};
    pub use polaron_runtime::simulation::{Simulation, SimulationEvent, SimulationStats};
}
