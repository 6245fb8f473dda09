//! Lattice — the fixed 3-D grid of sites carriers hop across.
//!
//! Sites are addressed by a flattened index
//! `col + row * width + layer * width * height`; the column axis is the
//! transport axis between the electrodes. Two pseudo-sites are appended
//! past the grid: `volume()` for the source and `volume() + 1` for the
//! drain, so electrode occupancy and roles live in the same arrays as
//! everything else.
//!
//! The lattice owns no agents. Sites hold `Occupant` handles; the
//! simulation controller owns the carriers themselves.

use crate::error::{PolaronError, Result, TopologyError};
use crate::types::{HopRange, Occupant, SiteIndex, SiteRole};

/// Fixed 3-D grid of sites with role classification and occupancy.
pub struct Lattice {
    width: usize,
    height: usize,
    depth: usize,
    roles: Vec<SiteRole>,
    occupants: Vec<Option<Occupant>>,
}

impl Lattice {
    /// Create a lattice of `width × height × depth` normal sites with
    /// the two electrode pseudo-sites appended and pre-occupied.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        let volume = width * height * depth;
        let mut roles = vec![SiteRole::Normal; volume + 2];
        let mut occupants = vec![None; volume + 2];
        roles[volume] = SiteRole::Source;
        roles[volume + 1] = SiteRole::Drain;
        occupants[volume] = Some(Occupant::Source);
        occupants[volume + 1] = Some(Occupant::Drain);
        Self {
            width,
            height,
            depth,
            roles,
            occupants,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of grid sites (electrode pseudo-sites excluded).
    pub fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Index of the source electrode pseudo-site.
    pub fn source_site(&self) -> SiteIndex {
        self.volume()
    }

    /// Index of the drain electrode pseudo-site.
    pub fn drain_site(&self) -> SiteIndex {
        self.volume() + 1
    }

    /// Grid sites plus the two electrodes.
    pub fn total_sites(&self) -> usize {
        self.volume() + 2
    }

    /// Flattened index for a grid coordinate.
    pub fn site_index(&self, col: usize, row: usize, layer: usize) -> Result<SiteIndex> {
        if col >= self.width {
            return Err(PolaronError::Topology(TopologyError::CoordinateOutOfRange {
                axis: "column",
                value: col,
                limit: self.width,
            }));
        }
        if row >= self.height {
            return Err(PolaronError::Topology(TopologyError::CoordinateOutOfRange {
                axis: "row",
                value: row,
                limit: self.height,
            }));
        }
        if layer >= self.depth {
            return Err(PolaronError::Topology(TopologyError::CoordinateOutOfRange {
                axis: "layer",
                value: layer,
                limit: self.depth,
            }));
        }
        Ok(col + row * self.width + layer * self.width * self.height)
    }

    pub fn column_of(&self, site: SiteIndex) -> usize {
        site % self.width
    }

    pub fn row_of(&self, site: SiteIndex) -> usize {
        (site / self.width) % self.height
    }

    pub fn layer_of(&self, site: SiteIndex) -> usize {
        site / (self.width * self.height)
    }

    /// The role assigned to a site.
    pub fn role(&self, site: SiteIndex) -> SiteRole {
        self.roles[site]
    }

    /// Classify a site. Electrode roles are fixed at construction.
    pub fn set_role(&mut self, site: SiteIndex, role: SiteRole) -> Result<()> {
        if site >= self.volume() {
            return Err(PolaronError::site_out_of_range(site, self.volume()));
        }
        self.roles[site] = role;
        Ok(())
    }

    pub fn occupant(&self, site: SiteIndex) -> Option<Occupant> {
        self.occupants[site]
    }

    pub fn set_occupant(&mut self, site: SiteIndex, occupant: Occupant) {
        self.occupants[site] = Some(occupant);
    }

    pub fn clear_occupant(&mut self, site: SiteIndex) {
        self.occupants[site] = None;
    }

    /// Whether a carrier may land on this site right now: a normal-role
    /// grid site with no occupant. The drain is handled separately by
    /// the transport decision (it always accepts).
    pub fn is_open(&self, site: SiteIndex) -> bool {
        site < self.volume()
            && self.roles[site] == SiteRole::Normal
            && self.occupants[site].is_none()
    }

    /// All grid sites within `hop_range` Manhattan distance of `site`,
    /// plus the adjacent electrode pseudo-site for boundary columns.
    ///
    /// Requesting neighbors of an out-of-range or electrode index is a
    /// construction-time defect, never expected from valid setup.
    pub fn neighbors_of(&self, site: SiteIndex, hop_range: HopRange) -> Result<Vec<SiteIndex>> {
        if site >= self.total_sites() {
            return Err(PolaronError::site_out_of_range(site, self.volume()));
        }
        if site >= self.volume() {
            return Err(PolaronError::Topology(TopologyError::ElectrodeNeighborQuery {
                site,
            }));
        }

        let range = hop_range.0 as isize;
        let col = self.column_of(site) as isize;
        let row = self.row_of(site) as isize;
        let layer = self.layer_of(site) as isize;

        let mut neighbors = Vec::new();
        for dl in -range..=range {
            for dr in -range..=range {
                for dc in -range..=range {
                    if dc == 0 && dr == 0 && dl == 0 {
                        continue;
                    }
                    if dc.abs() + dr.abs() + dl.abs() > range {
                        continue;
                    }
                    let (c, r, l) = (col + dc, row + dr, layer + dl);
                    if c < 0
                        || r < 0
                        || l < 0
                        || c >= self.width as isize
                        || r >= self.height as isize
                        || l >= self.depth as isize
                    {
                        continue;
                    }
                    neighbors.push(
                        c as usize + r as usize * self.width + l as usize * self.width * self.height,
                    );
                }
            }
        }

        // Boundary columns face an electrode across the contact.
        if col == 0 {
            neighbors.push(self.source_site());
        }
        if col == self.width as isize - 1 {
            neighbors.push(self.drain_site());
        }

        Ok(neighbors)
    }

    /// All sites in one column, across every row and layer. Used to
    /// register electrode neighbor lists at construction.
    pub fn column_sites(&self, col: usize) -> Result<Vec<SiteIndex>> {
        if col >= self.width {
            return Err(PolaronError::Topology(TopologyError::CoordinateOutOfRange {
                axis: "column",
                value: col,
                limit: self.width,
            }));
        }
        let mut sites = Vec::with_capacity(self.height * self.depth);
        for layer in 0..self.depth {
            for row in 0..self.height {
                sites.push(col + row * self.width + layer * self.width * self.height);
            }
        }
        Ok(sites)
    }

    /// Euclidean distance between two sites over grid coordinates.
    /// A hop across a contact (either pseudo-site involved) counts as
    /// one lattice unit.
    pub fn distance_between(&self, a: SiteIndex, b: SiteIndex) -> f64 {
        if a >= self.volume() || b >= self.volume() {
            return 1.0;
        }
        let dc = self.column_of(a) as f64 - self.column_of(b) as f64;
        let dr = self.row_of(a) as f64 - self.row_of(b) as f64;
        let dl = self.layer_of(a) as f64 - self.layer_of(b) as f64;
        (dc * dc + dr * dr + dl * dl).sqrt()
    }

    /// Sites currently holding a carrier, in site order.
    pub fn occupied_sites(&self) -> Vec<SiteIndex> {
        (0..self.volume())
            .filter(|&s| matches!(self.occupants[s], Some(Occupant::Carrier(_))))
            .collect()
    }
}
