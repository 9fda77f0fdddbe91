use anyhow::{Context, Result};
use orgmine::{read_pairs, save_adjacency, Adjacency, Config};
use std::collections::HashSet;
use std::path::Path;

use super::adjacency_path;

pub fn run(
    dir: &Path,
    file: &Path,
    id_column: Option<&str>,
    manager_column: Option<&str>,
    json: bool,
) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!("Orgmine not initialized. Run 'om init' first.");
    }

    let config = Config::load(dir)?;
    let id_column = id_column.unwrap_or(&config.ingest.id_column);
    let manager_column = manager_column.unwrap_or(&config.ingest.manager_column);

    let pairs = read_pairs(file, id_column, manager_column)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    // Managers that never appear as an employee row are still fully
    // initialized nodes; they are where the roots come from.
    let employees: HashSet<_> = pairs.iter().map(|&(person, _)| person).collect();
    let adj = Adjacency::from_pairs(pairs.iter().copied());
    let unmanaged_managers = adj.len() - employees.len();

    let path = adjacency_path(dir);
    save_adjacency(&adj, &path).context("Failed to write adjacency mapping")?;

    if json {
        let output = serde_json::json!({
            "rows": pairs.len(),
            "people": adj.len(),
            "managers_without_employee_row": unmanaged_managers,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Ingested {} rows: {} people ({} managers with no employee row)",
            pairs.len(),
            adj.len(),
            unmanaged_managers
        );
        println!("Adjacency mapping written to {}", path.display());
    }

    Ok(())
}
