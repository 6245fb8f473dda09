//! Configuration management for the Polaron CLI.

use anyhow::{Context, Result};
use polaron::prelude::{ReportOptions, SimulationParameters};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A Polaron run configuration: the simulation parameters plus where
/// and what to report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationParameters,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory report files are written into.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// File-name stem shared by every report of the run.
    #[serde(default = "default_stub")]
    pub stub: String,
    /// Which reports to emit.
    #[serde(default)]
    pub reports: ReportOptions,
}

fn default_directory() -> String {
    "output".to_string()
}

fn default_stub() -> String {
    "run".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationParameters::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            stub: default_stub(),
            reports: ReportOptions::default(),
        }
    }
}

impl Config {
    /// Load a config from an explicit path, or find polaron.toml in the
    /// current or parent directories.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => find_config_file().context(
                "No polaron.toml found in this or any parent directory. Run `polaron init` first.",
            )?,
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save the config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find polaron.toml in the current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join("polaron.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
