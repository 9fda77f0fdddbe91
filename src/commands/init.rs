use anyhow::{Context, Result};
use orgmine::Config;
use std::fs;
use std::path::Path;

pub fn run(dir: &Path) -> Result<()> {
    if dir.exists() {
        anyhow::bail!("Orgmine already initialized at {}", dir.display());
    }

    fs::create_dir_all(dir).context("Failed to create orgmine directory")?;

    Config::default()
        .save(dir)
        .context("Failed to write config.toml")?;

    println!("Initialized orgmine at {}", dir.display());
    Ok(())
}
