//! Consistency checks over the adjacency mapping.
//!
//! Everything here is advisory except manager conflicts, which are the one
//! structural contract violation: extraction will refuse to run on them.

use crate::adjacency::{Adjacency, PersonId};
use crate::extract::unreachable_ids;
use serde::Serialize;

/// Result of checking a mapping for issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    /// People with more than one distinct manager (errors).
    pub manager_conflicts: Vec<ManagerConflict>,
    /// People listed as their own manager (warnings; ignored everywhere).
    pub self_loops: Vec<PersonId>,
    /// People no root can reach, i.e. members of manager cycles
    /// (warnings; they will be left out of the forest).
    pub unreachable: Vec<PersonId>,
    pub ok: bool,
}

/// One person with a conflicting manager record.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerConflict {
    pub person: PersonId,
    /// The full manager list as recorded, duplicates and all.
    pub managers: Vec<PersonId>,
}

/// Run all mapping checks. Unlike extraction this never fails: conflicts
/// are collected, not raised, so a broken mapping can be reported whole.
pub fn check_mapping(adj: &Adjacency) -> CheckResult {
    let mut result = CheckResult::default();

    for id in adj.ids() {
        if adj.distinct_managers(id).len() > 1 {
            result.manager_conflicts.push(ManagerConflict {
                person: id,
                managers: adj.managers_of(id).to_vec(),
            });
        }
        if adj.managers_of(id).contains(&id) || adj.reports_of(id).contains(&id) {
            result.self_loops.push(id);
        }
    }
    result.unreachable = unreachable_ids(adj);

    result.ok = result.manager_conflicts.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_mapping_is_ok() {
        let adj = Adjacency::from_pairs([(1, 2), (2, 3)]);
        let result = check_mapping(&adj);
        assert!(result.ok);
        assert!(result.manager_conflicts.is_empty());
        assert!(result.self_loops.is_empty());
        assert!(result.unreachable.is_empty());
    }

    #[test]
    fn test_manager_conflict_reported_with_full_list() {
        let adj = Adjacency::from_pairs([(1, 2), (1, 3), (1, 2)]);
        let result = check_mapping(&adj);
        assert!(!result.ok);
        assert_eq!(result.manager_conflicts.len(), 1);
        assert_eq!(result.manager_conflicts[0].person, 1);
        assert_eq!(result.manager_conflicts[0].managers, vec![2, 3, 2]);
    }

    #[test]
    fn test_self_loops_warn_but_stay_ok() {
        let mut adj = Adjacency::from_pairs([(1, 2)]);
        adj.record(7, 7);
        let result = check_mapping(&adj);
        assert!(result.ok);
        assert_eq!(result.self_loops, vec![7]);
    }

    #[test]
    fn test_cycle_members_reported_unreachable() {
        let adj = Adjacency::from_pairs([(1, 2), (5, 6), (6, 5)]);
        let result = check_mapping(&adj);
        assert!(result.ok);
        assert_eq!(result.unreachable, vec![5, 6]);
    }
}
