use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct TreeStats {
    key: usize,
    max_depth: usize,
    min_depth: usize,
    nodes: usize,
}

pub fn run(dir: &Path, out: Option<&Path>, json: bool) -> Result<()> {
    let forest = super::load_forest_checked(dir)?;

    let rows: Vec<TreeStats> = forest
        .iter()
        .map(|(key, tree)| TreeStats {
            key,
            max_depth: tree.max_depth(),
            min_depth: tree.min_depth(),
            nodes: tree.num_nodes(),
        })
        .collect();

    if let Some(out) = out {
        let mut csv = String::from("Key,Max Depth,Min Depth,Nodes\n");
        for row in &rows {
            writeln!(
                csv,
                "{},{},{},{}",
                row.key, row.max_depth, row.min_depth, row.nodes
            )?;
        }
        fs::write(out, csv).with_context(|| format!("Failed to write {}", out.display()))?;
        println!("Stats for {} trees written to {}", rows.len(), out.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("Forest is empty");
    } else {
        println!("{:>6}  {:>9}  {:>9}  {:>6}", "Key", "Max Depth", "Min Depth", "Nodes");
        for row in &rows {
            println!(
                "{:>6}  {:>9}  {:>9}  {:>6}",
                row.key, row.max_depth, row.min_depth, row.nodes
            );
        }
    }

    Ok(())
}
