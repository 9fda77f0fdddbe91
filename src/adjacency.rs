//! Person-adjacency data model: who manages whom, in both directions.
//!
//! The raw feed is employee→manager edges. In tree terms the edge is
//! inverted: a person's manager is their *parent* in the extracted
//! hierarchy and their reports are the *children*. The system this
//! replaces stored the lists under swapped names (`child` held managers
//! and `parent` held reports, a recorded naming accident that was never
//! corrected). The lists here are named by what they hold: `managers`
//! ascends, `reports` descends.
//!
//! Entries iterate in first-insertion order, which makes root discovery
//! and forest indices deterministic across runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique person identifier as it appears in the source dataset.
pub type PersonId = u64;

/// Both neighbor lists of one person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    /// Ids this person reports up to. Well-formed data has at most one
    /// distinct non-self entry; duplicates from repeated input rows are
    /// kept as recorded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managers: Vec<PersonId>,
    /// Ids reporting to this person.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<PersonId>,
}

/// The adjacency mapping for the whole dataset.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    entries: HashMap<PersonId, Neighbors>,
    /// First-insertion order of keys; drives all iteration.
    order: Vec<PersonId>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(person, manager)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (PersonId, PersonId)>,
    {
        let mut adj = Self::new();
        for (person, manager) in pairs {
            adj.record(person, manager);
        }
        adj
    }

    fn entry(&mut self, id: PersonId) -> &mut Neighbors {
        self.entries.entry(id).or_insert_with(|| {
            self.order.push(id);
            Neighbors::default()
        })
    }

    /// Record one `person reports to manager` row.
    ///
    /// Both ids are fully initialized as keys even when the manager never
    /// appears as an employee row: a manager with no further manager is a
    /// valid node, and that is exactly how roots become discoverable.
    /// Skipping unknown managers would silently drop every root.
    pub fn record(&mut self, person: PersonId, manager: PersonId) {
        self.entry(person).managers.push(manager);
        self.entry(manager).reports.push(person);
    }

    /// Insert a fully formed entry, preserving first-insertion order.
    /// Used when re-loading a persisted mapping.
    pub fn insert(&mut self, id: PersonId, neighbors: Neighbors) {
        if self.entries.insert(id, neighbors).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: PersonId) -> Option<&Neighbors> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All ids in first-insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.order.iter().copied()
    }

    /// All entries in first-insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (PersonId, &Neighbors)> {
        self.order.iter().map(|id| (*id, &self.entries[id]))
    }

    /// Raw manager list as recorded (may contain duplicates or self).
    pub fn managers_of(&self, id: PersonId) -> &[PersonId] {
        self.entries.get(&id).map(|n| n.managers.as_slice()).unwrap_or(&[])
    }

    /// Raw report list as recorded (may contain duplicates or self).
    pub fn reports_of(&self, id: PersonId) -> &[PersonId] {
        self.entries.get(&id).map(|n| n.reports.as_slice()).unwrap_or(&[])
    }

    /// Distinct managers of `id`, self-loops filtered, first-seen order.
    /// More than one entry here is the data-consistency violation the
    /// extractor aborts on.
    pub fn distinct_managers(&self, id: PersonId) -> Vec<PersonId> {
        let mut distinct = Vec::new();
        for &m in self.managers_of(id) {
            if m != id && !distinct.contains(&m) {
                distinct.push(m);
            }
        }
        distinct
    }

    /// Root candidates: ids with no recorded manager besides themselves,
    /// in first-insertion order.
    pub fn roots(&self) -> Vec<PersonId> {
        self.ids()
            .filter(|&id| self.distinct_managers(id).is_empty())
            .collect()
    }
}
