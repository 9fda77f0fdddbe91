use anyhow::{Context, Result};
use orgmine::{load_labeled, save_labeled, RoleBook};
use std::collections::BTreeMap;
use std::path::Path;

use super::roletrees_path;

pub fn run(dir: &Path, roles: &Path, name: &str, tree: usize, json: bool) -> Result<()> {
    let forest = super::load_forest_checked(dir)?;

    let Some(raw_tree) = forest.get(tree) else {
        anyhow::bail!(
            "No tree {} in forest ({} trees, indices 0..{})",
            tree,
            forest.len(),
            forest.len()
        );
    };

    let book = RoleBook::load(roles)
        .with_context(|| format!("Failed to load role book {}", roles.display()))?;
    let labeled = book
        .label_tree(raw_tree)
        .context("Label substitution failed")?;

    let path = roletrees_path(dir);
    let mut trees = if path.exists() {
        load_labeled(&path).context("Failed to load existing role trees")?
    } else {
        BTreeMap::new()
    };
    let replaced = trees.insert(name.to_string(), labeled).is_some();
    save_labeled(&trees, &path).context("Failed to write role trees")?;

    if json {
        let output = serde_json::json!({
            "name": name,
            "tree": tree,
            "nodes": trees[name].num_nodes(),
            "replaced": replaced,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let verb = if replaced { "Replaced" } else { "Stored" };
        println!(
            "{} labeled tree '{}' ({} nodes, from forest tree {}) in {}",
            verb,
            name,
            trees[name].num_nodes(),
            tree,
            path.display()
        );
    }

    Ok(())
}
