use anyhow::Result;
use orgmine::check_mapping;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckJsonOutput {
    ok: bool,
    manager_conflicts: Vec<orgmine::ManagerConflict>,
    self_loops: Vec<orgmine::PersonId>,
    unreachable: Vec<orgmine::PersonId>,
    people: usize,
    warnings: usize,
    errors: usize,
}

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let adj = super::load_adjacency_checked(dir)?;
    let result = check_mapping(&adj);

    let warnings = result.self_loops.len() + result.unreachable.len();
    let errors = result.manager_conflicts.len();

    if json {
        let output = CheckJsonOutput {
            ok: result.ok,
            manager_conflicts: result.manager_conflicts,
            self_loops: result.self_loops,
            unreachable: result.unreachable,
            people: adj.len(),
            warnings,
            errors,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        if errors > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Self-loops are warnings: they are filtered wherever lists are used
    if !result.self_loops.is_empty() {
        eprintln!("Warning: people recorded as their own manager (ignored during extraction):");
        for id in &result.self_loops {
            eprintln!("  {}", id);
        }
    }

    // Unreachable nodes are warnings: they sit on manager cycles and will
    // be left out of the forest
    if !result.unreachable.is_empty() {
        eprintln!("Warning: people unreachable from any root (manager cycle?):");
        for id in &result.unreachable {
            eprintln!("  {}", id);
        }
    }

    // Manager conflicts are errors: extraction refuses to run on them
    if !result.manager_conflicts.is_empty() {
        eprintln!("Error: people with more than one manager on record:");
        for conflict in &result.manager_conflicts {
            eprintln!("  {} reports to {:?}", conflict.person, conflict.managers);
        }
    }

    if errors > 0 {
        anyhow::bail!("Found {} error(s) and {} warning(s)", errors, warnings);
    } else if warnings > 0 {
        println!("Mapping OK: {} people, {} warning(s)", adj.len(), warnings);
    } else {
        println!("Mapping OK: {} people, no issues found", adj.len());
    }

    Ok(())
}
