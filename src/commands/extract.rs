use anyhow::{Context, Result};
use orgmine::{extract_forest, load_forest, save_forest};
use std::path::Path;

use super::forest_path;

pub fn run(dir: &Path, force: bool, json: bool) -> Result<()> {
    let adj = super::load_adjacency_checked(dir)?;
    let path = forest_path(dir);

    // Construction is the expensive step; reuse the persisted forest
    // unless asked to rebuild.
    if path.exists() && !force {
        let forest = load_forest(&path).context("Failed to load existing forest")?;
        if json {
            let output = serde_json::json!({
                "trees": forest.len(),
                "nodes": forest.num_nodes(),
                "rebuilt": false,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Forest already extracted ({} trees). Use --force to rebuild.",
                forest.len()
            );
        }
        return Ok(());
    }

    let roots = adj.roots();
    let forest = extract_forest(&adj).context("Extraction failed")?;
    save_forest(&forest, &path).context("Failed to write forest")?;

    let covered = forest.num_nodes();
    if covered < adj.len() {
        eprintln!(
            "Warning: {} people unreachable from any root were left out (see 'om check')",
            adj.len() - covered
        );
    }

    if json {
        let output = serde_json::json!({
            "roots": roots.len(),
            "trees": forest.len(),
            "nodes": covered,
            "rebuilt": true,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Discovered {} roots", roots.len());
        println!(
            "Extracted {} trees covering {} people",
            forest.len(),
            covered
        );
        println!("Forest written to {}", path.display());
    }

    Ok(())
}
