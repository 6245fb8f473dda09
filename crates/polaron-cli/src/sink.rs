//! FileSink — writes reports as whitespace-delimited .dat files.
//!
//! Every file of a run shares the configured stem:
//!
//! - `{stub}-field-0.dat`, `{stub}-trap-0.dat`, `{stub}-coulomb-{tick}.dat`
//!   — one energy value per line, site order
//! - `{stub}-defect-ids.dat`, `{stub}-trap-ids.dat` — one site index per line
//! - `{stub}-carriers-{tick}.dat` — `site carrier` per line
//! - `{stub}-carrier-stats.dat` — `tick lifetime displacement` per
//!   absorption, appended as the run progresses
//!
//! A pre-existing file is rotated to a numbered backup instead of being
//! overwritten, so repeated runs into the same directory never destroy
//! earlier results.

use polaron::prelude::{
    CarrierFate, CarrierId, EnergyLayer, PolaronError, ReportSink, Result, RunId, SiteIndex,
    SiteList, Tick,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileSink {
    directory: PathBuf,
    stub: String,
    /// Open append handle for the streaming carrier-stats file.
    stats_file: Option<File>,
}

impl FileSink {
    /// Create the output directory if needed and bind the file stem.
    pub fn new(directory: &str, stub: &str) -> std::io::Result<Self> {
        std::fs::create_dir_all(directory)?;
        Ok(Self {
            directory: PathBuf::from(directory),
            stub: stub.to_string(),
            stats_file: None,
        })
    }

    fn path_for(&self, kind: &str) -> PathBuf {
        self.directory.join(format!("{}-{}.dat", self.stub, kind))
    }

    /// Open a fresh report file, rotating any pre-existing one to the
    /// first free numbered backup.
    fn create(&self, path: &Path) -> Result<File> {
        backup_existing(path)?;
        debug!(path = %path.display(), "writing report");
        Ok(File::create(path)?)
    }
}

/// Rotate `name.dat` to `name.dat.1` (or the first free suffix).
fn backup_existing(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    for n in 1u32.. {
        let backup = PathBuf::from(format!("{}.{}", path.display(), n));
        if !backup.exists() {
            std::fs::rename(path, &backup)?;
            return Ok(());
        }
    }
    unreachable!("no free backup suffix");
}

impl ReportSink for FileSink {
    fn energy_grid(
        &mut self,
        run: RunId,
        tick: Tick,
        layer: EnergyLayer,
        values: &[f64],
    ) -> Result<()> {
        let path = self.path_for(&format!("{}-{}", layer.label(), tick));
        let mut file = self.create(&path)?;
        writeln!(file, "# run {} tick {} layer {}", run, tick, layer.label())?;
        for value in values {
            writeln!(file, "{}", value)?;
        }
        Ok(())
    }

    fn site_list(&mut self, run: RunId, list: SiteList, sites: &[SiteIndex]) -> Result<()> {
        let path = self.path_for(list.label());
        let mut file = self.create(&path)?;
        writeln!(file, "# run {} {}", run, list.label())?;
        for site in sites {
            writeln!(file, "{}", site)?;
        }
        Ok(())
    }

    fn carrier_snapshot(
        &mut self,
        run: RunId,
        tick: Tick,
        carriers: &[(SiteIndex, CarrierId)],
    ) -> Result<()> {
        let path = self.path_for(&format!("carriers-{}", tick));
        let mut file = self.create(&path)?;
        writeln!(file, "# run {} tick {} site carrier", run, tick)?;
        for (site, id) in carriers {
            writeln!(file, "{} {}", site, id)?;
        }
        Ok(())
    }

    fn carrier_fate(&mut self, run: RunId, fate: &CarrierFate) -> Result<()> {
        if self.stats_file.is_none() {
            let path = self.path_for("carrier-stats");
            let mut file = self.create(&path)?;
            writeln!(file, "# run {} tick lifetime displacement", run)?;
            self.stats_file = Some(file);
        }
        let file = self
            .stats_file
            .as_mut()
            .ok_or_else(|| PolaronError::Io("carrier-stats file closed".to_string()))?;
        writeln!(file, "{} {} {}", fate.tick, fate.lifetime, fate.displacement)?;
        Ok(())
    }
}
