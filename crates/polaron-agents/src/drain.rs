//! DrainAgent — absorbs carriers at the drain electrode.
//!
//! The drain always accepts an incoming charge; the controller calls
//! `accept_charge(-1)` as the bookkeeping hook on every absorption, and
//! `accepted_charges()` exposes the monotonically increasing total for
//! reporting.

use polaron_core::agent::Agent;
use polaron_core::types::{SiteIndex, SiteRole};

/// The absorbing electrode.
pub struct DrainAgent {
    site: SiteIndex,
    neighbors: Vec<SiteIndex>,
    accepted: u64,
}

impl DrainAgent {
    pub fn new(site: SiteIndex) -> Self {
        Self {
            site,
            neighbors: Vec::new(),
            accepted: 0,
        }
    }

    /// Register the boundary-column sites adjacent to this drain.
    pub fn set_neighbors(&mut self, neighbors: Vec<SiteIndex>) {
        self.neighbors = neighbors;
    }

    pub fn neighbors(&self) -> &[SiteIndex] {
        &self.neighbors
    }

    /// Total charges absorbed since the run began. Never decreases.
    pub fn accepted_charges(&self) -> u64 {
        self.accepted
    }
}

impl Agent for DrainAgent {
    fn site(&self) -> SiteIndex {
        self.site
    }

    fn role(&self) -> SiteRole {
        SiteRole::Drain
    }

    fn accept_charge(&mut self, _charge: i32) -> bool {
        self.accepted += 1;
        true
    }
}
