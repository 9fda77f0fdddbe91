//! Rooted, exclusively-owned trees.
//!
//! Children are owned by value, so a subtree can only ever belong to one
//! tree. `graft` takes its argument by move: attaching a subtree transfers
//! ownership instead of deep-copying, and aliasing across trees is
//! unrepresentable.

use serde::{Deserialize, Serialize};

/// A tree node: one payload plus an ordered list of child subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Tree<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    /// Append a new leaf child.
    pub fn insert(&mut self, value: T) {
        self.children.push(Tree::new(value));
    }

    /// Append a whole subtree, taking ownership of it.
    pub fn graft(&mut self, subtree: Tree<T>) {
        self.children.push(subtree);
    }

    /// Longest root-to-leaf chain; a lone root has depth 1.
    pub fn max_depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Tree::max_depth)
            .max()
            .unwrap_or(0)
    }

    /// Shortest root-to-leaf chain; a lone root has depth 1.
    pub fn min_depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Tree::min_depth)
            .min()
            .unwrap_or(0)
    }

    /// Total node count, root included.
    pub fn num_nodes(&self) -> usize {
        1 + self.children.iter().map(Tree::num_nodes).sum::<usize>()
    }

    /// Produce a new tree of identical shape with every payload passed
    /// through `f`. The first failure aborts the whole transform.
    pub fn try_map<U, E, F>(&self, f: &mut F) -> Result<Tree<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        let mut mapped = Tree::new(f(&self.value)?);
        for child in &self.children {
            mapped.children.push(child.try_map(f)?);
        }
        Ok(mapped)
    }
}

impl<T: PartialEq> Tree<T> {
    /// Whether `value` occurs anywhere in this subtree.
    pub fn contains(&self, value: &T) -> bool {
        self.value == *value || self.children.iter().any(|c| c.contains(value))
    }
}
