//! # Polaron Agents
//!
//! The occupants of the lattice: mobile `CarrierAgent`s and the two
//! electrode singletons, `SourceAgent` and `DrainAgent`. All three share
//! the minimal hopping contract from `polaron_core::agent`; the carrier
//! additionally runs a two-phase propose/commit state machine so that
//! many carriers can evaluate moves concurrently against a consistent
//! committed snapshot.
//!
//! The propose phase is made read-only *structurally*: it receives a
//! [`WorldView`](view::WorldView), which exposes only shared-read
//! queries, and writes nothing but the proposing carrier's own transient
//! `future_site`. The commit phase is the only code that touches the
//! lattice occupancy map, and it requires `&mut Lattice`.

pub mod carrier;
pub mod drain;
pub mod source;
pub mod view;
pub mod prelude;
