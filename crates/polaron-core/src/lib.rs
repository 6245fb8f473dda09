//! # Polaron Core
//!
//! Core types and components for kinetic Monte Carlo charge transport
//! through a disordered lattice. This crate defines the device model
//! shared across the entire workspace:
//!
//! - **Lattice** — the fixed 3-D grid of sites, their roles
//!   (normal / defect / source / drain) and occupancy, plus neighbor
//!   and topology queries
//! - **PotentialField** — per-site energy split into a linear bias
//!   layer, a trap layer, and a pairwise Coulomb layer over the live
//!   carriers
//! - **RandomSource** — a seeded random stream with deterministic,
//!   independently forkable sub-streams
//! - **SimulationParameters** — the full configuration contract,
//!   validated before any component is built
//!
//! ## Quick Start
//!
//! ```rust
//! use polaron_core::prelude::*;
//!
//! let params = SimulationParameters::default();
//! let mut rng = RandomSource::new(params.random_seed);
//! let lattice = Lattice::new(params.grid_width, params.grid_height, params.grid_depth);
//! assert_eq!(lattice.volume(), 1024 * 256);
//! let _ = rng.uniform();
//! ```

pub mod agent;
pub mod error;
pub mod lattice;
pub mod params;
pub mod potential;
pub mod rng;
pub mod types;
pub mod prelude;
