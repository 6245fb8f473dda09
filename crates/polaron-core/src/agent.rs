//! Agent — the minimal hopping contract.
//!
//! Carriers, the source, and the drain all occupy lattice sites and all
//! take part in charge transfer, but only through this small surface:
//! where they sit, what role that site has, and whether they will host
//! an incoming charge right now. Everything else (the carrier's
//! two-phase propose/commit state machine, the source's injection
//! bookkeeping) belongs to the concrete types.

use crate::types::{SiteIndex, SiteRole};

/// An occupant of the lattice that participates in charge transfer.
pub trait Agent {
    /// The site this agent occupies.
    fn site(&self) -> SiteIndex;

    /// The role of the site this agent occupies.
    fn role(&self) -> SiteRole;

    /// Synchronous admission check: may a carrier land here right now?
    ///
    /// The drain always accepts (and the caller removes the incoming
    /// carrier); the source never accepts. A carrier accepts nothing —
    /// its site is simply occupied.
    fn accept_charge(&mut self, charge: i32) -> bool;
}
