use anyhow::{Context, Result};
use orgmine::{load_labeled, Tree};
use std::path::Path;

use super::roletrees_path;

pub fn run(dir: &Path, tree: Option<usize>, labeled: Option<&str>) -> Result<()> {
    match (tree, labeled) {
        (Some(key), None) => {
            let forest = super::load_forest_checked(dir)?;
            let Some(tree) = forest.get(key) else {
                anyhow::bail!("No tree {} in forest ({} trees)", key, forest.len());
            };
            print_tree(tree, 0, &|id| id.to_string());
            Ok(())
        }
        (None, Some(name)) => {
            let path = roletrees_path(dir);
            if !path.exists() {
                anyhow::bail!("No labeled trees found. Run 'om label' first.");
            }
            let trees = load_labeled(&path).context("Failed to load role trees")?;
            let Some(tree) = trees.get(name) else {
                let available: Vec<_> = trees.keys().cloned().collect();
                anyhow::bail!("No labeled tree '{}'. Available: {:?}", name, available);
            };
            print_tree(tree, 0, &|role| {
                format!("{} ({})", role.name, role.description)
            });
            Ok(())
        }
        _ => anyhow::bail!("Specify exactly one of --tree <index> or --labeled <name>"),
    }
}

fn print_tree<T, F>(tree: &Tree<T>, depth: usize, render: &F)
where
    F: Fn(&T) -> String,
{
    println!("{}{}", "  ".repeat(depth), render(&tree.value));
    for child in &tree.children {
        print_tree(child, depth + 1, render);
    }
}
