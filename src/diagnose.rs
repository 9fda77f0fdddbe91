//! Pre-flight hierarchy diagnostics.
//!
//! Used to gauge whether a mapping is worth extracting at all: a flat
//! two-level org produces nothing but star-shaped trees. This is a
//! self-contained routine over the raw mapping; it shares no traversal
//! code with the extractor and never builds a tree.

use crate::adjacency::{Adjacency, PersonId};
use std::collections::HashSet;

/// Count the nodes that lie on a path longer than two hops: nodes with an
/// ancestor of an ancestor, or a descendant of a descendant. Self-loops
/// are ignored throughout, and each node is considered exactly once.
pub fn deep_node_count(adj: &Adjacency) -> usize {
    let mut seen: HashSet<PersonId> = HashSet::new();
    let mut count = 0;
    for id in adj.ids() {
        if !seen.insert(id) {
            continue;
        }

        let grand_manager = adj
            .managers_of(id)
            .iter()
            .filter(|&&m| m != id)
            .any(|&m| adj.managers_of(m).iter().any(|&g| g != m));
        let grand_report = adj
            .reports_of(id)
            .iter()
            .filter(|&&r| r != id)
            .any(|&r| adj.reports_of(r).iter().any(|&g| g != r));

        if grand_manager || grand_report {
            count += 1;
        }
    }
    count
}
