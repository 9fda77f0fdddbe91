//! Role books: externally supplied person-id → role lookups.
//!
//! A role book is a TOML file with one `[roles.<id>]` table per person,
//! supplied per named hierarchy shape (wide, deep, balance, ...). The book
//! must be total over the ids of any tree it is applied to.

use crate::adjacency::PersonId;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("role book key '{0}' is not a person id")]
    BadKey(String),
    #[error("no role for person {person}; the book covers {available:?}")]
    Missing {
        person: PersonId,
        available: Vec<PersonId>,
    },
}

/// A role label: title plus a one-sentence description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub description: String,
}

/// The id → role lookup for one named hierarchy.
#[derive(Debug, Clone, Default)]
pub struct RoleBook {
    roles: HashMap<PersonId, Role>,
}

/// On-disk shape: ids arrive as TOML table keys, i.e. strings.
#[derive(Deserialize)]
struct RoleBookFile {
    #[serde(default)]
    roles: HashMap<String, Role>,
}

impl RoleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RoleError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, RoleError> {
        let file: RoleBookFile = toml::from_str(text)?;
        let mut book = Self::new();
        for (key, role) in file.roles {
            let id: PersonId = key.parse().map_err(|_| RoleError::BadKey(key.clone()))?;
            book.roles.insert(id, role);
        }
        Ok(book)
    }

    pub fn insert(&mut self, id: PersonId, role: Role) {
        self.roles.insert(id, role);
    }

    pub fn get(&self, id: PersonId) -> Option<&Role> {
        self.roles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Ids the book covers, sorted (for error messages and listings).
    pub fn ids(&self) -> Vec<PersonId> {
        let mut ids: Vec<PersonId> = self.roles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Replace every id in `tree` with its role, preserving shape exactly.
    /// Fails on the first id the book does not cover.
    pub fn label_tree(&self, tree: &Tree<PersonId>) -> Result<Tree<Role>, RoleError> {
        tree.try_map(&mut |&person| {
            self.roles
                .get(&person)
                .cloned()
                .ok_or_else(|| RoleError::Missing {
                    person,
                    available: self.ids(),
                })
        })
    }
}
