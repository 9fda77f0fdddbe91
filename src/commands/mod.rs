pub mod analyze;
pub mod check;
pub mod extract;
pub mod ingest;
pub mod init;
pub mod label;
pub mod show;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use orgmine::{load_adjacency, load_forest, Adjacency, Forest};

pub fn adjacency_path(dir: &Path) -> PathBuf {
    dir.join("adjacency.jsonl")
}

pub fn forest_path(dir: &Path) -> PathBuf {
    dir.join("forest.json")
}

pub fn roletrees_path(dir: &Path) -> PathBuf {
    dir.join("roletrees.json")
}

/// Load the persisted adjacency mapping, with a usage hint if the
/// pipeline hasn't reached that stage yet.
pub fn load_adjacency_checked(dir: &Path) -> Result<Adjacency> {
    let path = adjacency_path(dir);
    if !path.exists() {
        anyhow::bail!("No adjacency mapping found. Run 'om ingest <file>' first.");
    }
    load_adjacency(&path).context("Failed to load adjacency mapping")
}

/// Load the persisted forest, with a usage hint if it hasn't been
/// extracted yet.
pub fn load_forest_checked(dir: &Path) -> Result<Forest> {
    let path = forest_path(dir);
    if !path.exists() {
        anyhow::bail!("No forest found. Run 'om extract' first.");
    }
    load_forest(&path).context("Failed to load forest")
}
