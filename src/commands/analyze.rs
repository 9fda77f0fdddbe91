use anyhow::Result;
use orgmine::deep_node_count;
use std::path::Path;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let adj = super::load_adjacency_checked(dir)?;
    let deep = deep_node_count(&adj);

    if json {
        let output = serde_json::json!({
            "people": adj.len(),
            "deep_nodes": deep,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} of {} people lie on a path longer than two hops",
            deep,
            adj.len()
        );
        if deep == 0 {
            println!("Hierarchy looks flat; extraction will mostly yield star-shaped trees.");
        }
    }

    Ok(())
}
