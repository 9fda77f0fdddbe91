pub mod adjacency;
pub mod check;
pub mod config;
pub mod diagnose;
pub mod extract;
pub mod ingest;
pub mod roles;
pub mod store;
pub mod tree;

pub use adjacency::{Adjacency, Neighbors, PersonId};
pub use check::{check_mapping, CheckResult, ManagerConflict};
pub use config::Config;
pub use diagnose::deep_node_count;
pub use extract::{extract_forest, unreachable_ids, ExtractError, Forest};
pub use ingest::{read_pairs, IngestError};
pub use roles::{Role, RoleBook, RoleError};
pub use store::{
    load_adjacency, load_forest, load_labeled, save_adjacency, save_forest, save_labeled,
    StoreError,
};
pub use tree::Tree;
