use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use super::SourceArgs;

/// Assemble a sample folder and write it as a snapshot
pub fn run(input: PathBuf, output: PathBuf, source: SourceArgs, force: bool) -> Result<()> {
    if !input.is_dir() {
        anyhow::bail!("Input is not a directory: {}", input.display());
    }
    if output.exists() && !force {
        anyhow::bail!(
            "Output already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let config = source.load_config()?;
    let heat_map = source.open(&input, &config)?;
    let summary = heat_map.dataset().summary();

    if super::is_json(&output) {
        let json = heat_map.snapshot().to_json()?;
        std::fs::write(&output, json)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    } else {
        heat_map
            .save(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    info!("Snapshot written to {}", output.display());
    println!("{}", summary);
    println!("Output: {}", output.display());
    Ok(())
}
