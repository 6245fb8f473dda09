//! Polaron Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use polaron_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    CarrierFate, CarrierId, EnergyLayer, HopOutcome, HopRange, Occupant, RunId, SiteIndex,
    SiteList, SiteRole, Tick,
};

// Re-export the core components
pub use crate::lattice::Lattice;
pub use crate::params::{CouplingMatrix, SimulationParameters};
pub use crate::potential::{acceptance_probability, PotentialField};
pub use crate::rng::RandomSource;

// Re-export the Agent trait
pub use crate::agent::Agent;

// Re-export error types
pub use crate::error::{PolaronError, Result};
