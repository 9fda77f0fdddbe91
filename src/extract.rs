//! Spanning-forest extraction.
//!
//! Roots are the people with no recorded manager. Each root's tree is
//! built by descending through report lists while consuming ids from a
//! working set, so every id lands in at most one tree and cyclic data
//! cannot recurse forever.

use crate::adjacency::{Adjacency, PersonId};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// A person reports to more than one distinct manager. The model
    /// forbids this; the recorded manager list is reproduced verbatim.
    #[error("person {person} has more than one manager on record: {managers:?}")]
    ManagerConflict {
        person: PersonId,
        managers: Vec<PersonId>,
    },
}

/// The extracted forest: sequential tree index → root tree. Indices are
/// assigned in root-discovery order and carry no meaning beyond identity,
/// but they are stable across runs and labeled trees are addressed by
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    trees: BTreeMap<usize, Tree<PersonId>>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a completed tree under the next sequential index.
    pub fn push(&mut self, tree: Tree<PersonId>) -> usize {
        let key = self.trees.len();
        self.trees.insert(key, tree);
        key
    }

    pub fn get(&self, key: usize) -> Option<&Tree<PersonId>> {
        self.trees.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Tree<PersonId>)> {
        self.trees.iter().map(|(k, t)| (*k, t))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Total number of nodes across all trees.
    pub fn num_nodes(&self) -> usize {
        self.trees.values().map(Tree::num_nodes).sum()
    }
}

/// Build the spanning forest for `adj`.
///
/// The single-manager invariant is validated globally before any tree is
/// built, so a violation fails deterministically with no partial forest.
pub fn extract_forest(adj: &Adjacency) -> Result<Forest, ExtractError> {
    for id in adj.ids() {
        if adj.distinct_managers(id).len() > 1 {
            return Err(ExtractError::ManagerConflict {
                person: id,
                managers: adj.managers_of(id).to_vec(),
            });
        }
    }

    let mut remaining: HashSet<PersonId> = adj.ids().collect();
    let mut forest = Forest::new();
    for root in adj.roots() {
        if !remaining.contains(&root) {
            continue;
        }
        let tree = descend(adj, root, &mut remaining);
        forest.push(tree);
    }
    Ok(forest)
}

/// Build the subtree rooted at `id`, consuming every id visited.
///
/// Ids are removed from `remaining` before their own expansion; a report
/// that has already been consumed elsewhere is skipped, as are
/// self-references. Reports are visited in recorded order.
fn descend(adj: &Adjacency, id: PersonId, remaining: &mut HashSet<PersonId>) -> Tree<PersonId> {
    remaining.remove(&id);
    let mut tree = Tree::new(id);
    for &report in adj.reports_of(id) {
        if report == id || !remaining.contains(&report) {
            continue;
        }
        tree.graft(descend(adj, report, remaining));
    }
    tree
}

/// Ids that no root can reach by descending report lists: the members of
/// manager cycles. Does not require the single-manager invariant, so it
/// is usable on mappings that `extract_forest` would reject.
pub fn unreachable_ids(adj: &Adjacency) -> Vec<PersonId> {
    let mut visited: HashSet<PersonId> = HashSet::new();
    let mut stack: Vec<PersonId> = adj.roots();
    for &root in &stack {
        visited.insert(root);
    }
    while let Some(id) = stack.pop() {
        for &report in adj.reports_of(id) {
            if report != id && visited.insert(report) {
                stack.push(report);
            }
        }
    }
    adj.ids().filter(|id| !visited.contains(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_extracts_single_tree_rooted_at_top() {
        // person 1 reports to 2, person 2 reports to 3, 3 is unmanaged
        let adj = Adjacency::from_pairs([(1, 2), (2, 3)]);
        let forest = extract_forest(&adj).unwrap();

        assert_eq!(forest.len(), 1);
        let tree = forest.get(0).unwrap();
        assert_eq!(tree.value, 3);
        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.num_nodes(), 3);
        assert_eq!(tree.children[0].value, 2);
        assert_eq!(tree.children[0].children[0].value, 1);
    }

    #[test]
    fn test_forest_covers_all_ids_disjointly() {
        let adj = Adjacency::from_pairs([(1, 2), (3, 2), (2, 9), (4, 5), (6, 5)]);
        let forest = extract_forest(&adj).unwrap();

        let mut seen = HashSet::new();
        for (_, tree) in forest.iter() {
            collect(tree, &mut seen);
        }
        let all: HashSet<PersonId> = adj.ids().collect();
        assert_eq!(seen, all);
        assert_eq!(forest.num_nodes(), adj.len());
    }

    fn collect(tree: &Tree<PersonId>, seen: &mut HashSet<PersonId>) {
        assert!(seen.insert(tree.value), "id {} in two trees", tree.value);
        for child in &tree.children {
            collect(child, seen);
        }
    }

    #[test]
    fn test_isolated_root_is_single_node_tree() {
        let mut adj = Adjacency::new();
        adj.insert(42, Default::default());
        let forest = extract_forest(&adj).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(0).unwrap().num_nodes(), 1);
    }

    #[test]
    fn test_two_managers_abort_before_any_tree() {
        let adj = Adjacency::from_pairs([(1, 2), (1, 3), (4, 5)]);
        let err = extract_forest(&adj).unwrap_err();
        match err {
            ExtractError::ManagerConflict { person, managers } => {
                assert_eq!(person, 1);
                assert_eq!(managers, vec![2, 3]);
            }
        }
    }

    #[test]
    fn test_duplicate_rows_do_not_conflict_or_duplicate_nodes() {
        let adj = Adjacency::from_pairs([(1, 2), (1, 2)]);
        let forest = extract_forest(&adj).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(0).unwrap().num_nodes(), 2);
    }

    #[test]
    fn test_self_loop_yields_same_forest_as_without() {
        let plain = Adjacency::from_pairs([(1, 2), (2, 3)]);
        let mut looped = Adjacency::from_pairs([(1, 2), (2, 3)]);
        looped.record(3, 3);

        let expected = extract_forest(&plain).unwrap();
        let got = extract_forest(&looped).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_forest_indices_follow_root_discovery_order() {
        let adj = Adjacency::from_pairs([(1, 2), (3, 4)]);
        let forest = extract_forest(&adj).unwrap();
        assert_eq!(forest.get(0).unwrap().value, 2);
        assert_eq!(forest.get(1).unwrap().value, 4);
    }

    #[test]
    fn test_manager_cycle_members_are_unreachable() {
        // 5 and 6 manage each other; 1 reports to 2 normally
        let adj = Adjacency::from_pairs([(1, 2), (5, 6), (6, 5)]);
        let forest = extract_forest(&adj).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(unreachable_ids(&adj), vec![5, 6]);
    }
}
