//! Write a default configuration file.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;

pub fn run(path: Option<String>) -> Result<()> {
    let path = path.unwrap_or_else(|| "polaron.toml".to_string());
    let path = Path::new(&path);

    if path.exists() {
        bail!("{} already exists; refusing to overwrite it", path.display());
    }

    Config::default().save(path)?;
    println!("{} Created {}", "✓".green(), path.display());
    println!();
    println!("Next steps:");
    println!("  {} edit {}", "1.".blue(), path.display());
    println!("  {} polaron run", "2.".blue());

    Ok(())
}
