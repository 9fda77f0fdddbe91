//! Persistence for the pipeline's artifacts.
//!
//! Three files live in the working directory:
//! - `adjacency.jsonl`: one JSON entry per line, `#` comments ignored.
//!   Line order is first-insertion order and is authoritative on reload.
//! - `forest.json`: the extracted forest in a versioned envelope.
//! - `roletrees.json`: labeled trees keyed by shape name, same envelope.
//!
//! All writes take an advisory lock and go through a temp file plus
//! atomic rename, so a crash mid-write leaves the previous file intact.

use crate::adjacency::{Adjacency, Neighbors, PersonId};
use crate::extract::Forest;
use crate::roles::Role;
use crate::tree::Tree;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Bumped when an envelope's layout changes incompatibly.
const FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error on line {line}: {source}")]
    JsonLine {
        line: usize,
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("unsupported {kind} format version {version} (this build reads {supported})")]
    Version {
        kind: &'static str,
        version: u32,
        supported: u32,
    },
}

/// RAII guard for file locks - automatically releases lock on drop
struct FileLock {
    #[cfg(unix)]
    file: File,
}

impl FileLock {
    /// Acquire an exclusive lock on a lock file
    #[cfg(unix)]
    fn acquire<P: AsRef<Path>>(lock_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = lock_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        // Exclusive lock (LOCK_EX) - blocks until available
        let fd = file.as_raw_fd();
        let ret = unsafe { libc::flock(fd, libc::LOCK_EX) };

        if ret != 0 {
            return Err(StoreError::Lock(format!(
                "Failed to acquire lock on {:?}: {}",
                lock_path.as_ref(),
                std::io::Error::last_os_error()
            )));
        }

        Ok(FileLock { file })
    }

    #[cfg(not(unix))]
    fn acquire<P: AsRef<Path>>(_lock_path: P) -> Result<Self, StoreError> {
        // No flock outside Unix; fall back to a no-op lock
        Ok(FileLock {})
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            // Best effort, ignore errors on drop
            let fd = self.file.as_raw_fd();
            unsafe {
                libc::flock(fd, libc::LOCK_UN);
            }
        }
    }
}

/// All artifacts in one directory share one lock file.
fn lock_path<P: AsRef<Path>>(artifact_path: P) -> PathBuf {
    match artifact_path.as_ref().parent() {
        Some(parent) => parent.join("store.lock"),
        None => PathBuf::from("store.lock"),
    }
}

/// Write `path` via a temp file in the same directory plus atomic rename,
/// fsyncing before the rename so a crash leaves the old file intact.
fn write_atomic<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut File) -> Result<(), StoreError>,
{
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");
    let tmp_path = parent.join(format!(".{}.tmp.{}", name, std::process::id()));

    let result = (|| -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;

        write(&mut file)?;

        file.flush()?;
        #[cfg(unix)]
        {
            let rc = unsafe { libc::fsync(file.as_raw_fd()) };
            if rc != 0 {
                return Err(StoreError::Io(std::io::Error::last_os_error()));
            }
        }

        Ok(())
    })();

    if result.is_ok() {
        std::fs::rename(&tmp_path, path)?;
    } else {
        let _ = std::fs::remove_file(&tmp_path);
    }

    result
}

/// One adjacency entry as persisted.
#[derive(Serialize, Deserialize)]
struct AdjacencyLine {
    id: PersonId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    managers: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    reports: Vec<PersonId>,
}

/// Save the adjacency mapping as JSONL, one entry per line in
/// first-insertion order.
pub fn save_adjacency<P: AsRef<Path>>(adj: &Adjacency, path: P) -> Result<(), StoreError> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path(path))?;

    write_atomic(path, |file| {
        writeln!(
            file,
            "# orgmine adjacency v{} generated {}",
            FORMAT_VERSION,
            Utc::now().to_rfc3339()
        )?;
        for (id, neighbors) in adj.entries() {
            let line = AdjacencyLine {
                id,
                managers: neighbors.managers.clone(),
                reports: neighbors.reports.clone(),
            };
            let json = serde_json::to_string(&line)?;
            writeln!(file, "{}", json)?;
        }
        Ok(())
    })
}

/// Load an adjacency mapping from JSONL. Blank lines and `#` comments are
/// skipped; a duplicate id overwrites the earlier entry with a warning.
pub fn load_adjacency<P: AsRef<Path>>(path: P) -> Result<Adjacency, StoreError> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path(path))?;

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut adj = Adjacency::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry: AdjacencyLine =
            serde_json::from_str(trimmed).map_err(|e| StoreError::JsonLine {
                line: line_num + 1,
                source: e,
            })?;
        if adj.contains(entry.id) {
            eprintln!(
                "Warning: duplicate entry for person {} at line {} (overwriting previous entry)",
                entry.id,
                line_num + 1
            );
        }
        adj.insert(
            entry.id,
            Neighbors {
                managers: entry.managers,
                reports: entry.reports,
            },
        );
    }

    Ok(adj)
}

/// Versioned wrapper around a persisted tree collection.
#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    generated_at: String,
    trees: T,
}

fn check_version(kind: &'static str, version: u32) -> Result<(), StoreError> {
    if version == FORMAT_VERSION {
        Ok(())
    } else {
        Err(StoreError::Version {
            kind,
            version,
            supported: FORMAT_VERSION,
        })
    }
}

/// Save the extracted forest as a single pretty-printed JSON document.
pub fn save_forest<P: AsRef<Path>>(forest: &Forest, path: P) -> Result<(), StoreError> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path(path))?;

    let envelope = Envelope {
        version: FORMAT_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        trees: forest,
    };
    write_atomic(path, |file| {
        serde_json::to_writer_pretty(&mut *file, &envelope)?;
        writeln!(file)?;
        Ok(())
    })
}

/// Load a previously extracted forest.
pub fn load_forest<P: AsRef<Path>>(path: P) -> Result<Forest, StoreError> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path(path))?;

    let file = File::open(path)?;
    let envelope: Envelope<Forest> = serde_json::from_reader(BufReader::new(file))?;
    check_version("forest", envelope.version)?;
    Ok(envelope.trees)
}

/// Save labeled role trees, keyed by hierarchy shape name.
pub fn save_labeled<P: AsRef<Path>>(
    trees: &BTreeMap<String, Tree<Role>>,
    path: P,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path(path))?;

    let envelope = Envelope {
        version: FORMAT_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        trees,
    };
    write_atomic(path, |file| {
        serde_json::to_writer_pretty(&mut *file, &envelope)?;
        writeln!(file)?;
        Ok(())
    })
}

/// Load labeled role trees.
pub fn load_labeled<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, Tree<Role>>, StoreError> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path(path))?;

    let file = File::open(path)?;
    let envelope: Envelope<BTreeMap<String, Tree<Role>>> =
        serde_json::from_reader(BufReader::new(file))?;
    check_version("role trees", envelope.version)?;
    Ok(envelope.trees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_forest;
    use std::fs;
    use tempfile::TempDir;

    fn sample_adjacency() -> Adjacency {
        Adjacency::from_pairs([(1, 2), (2, 3), (5, 3)])
    }

    #[test]
    fn test_adjacency_round_trip_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("adjacency.jsonl");
        let adj = sample_adjacency();

        save_adjacency(&adj, &path).unwrap();
        let loaded = load_adjacency(&path).unwrap();

        assert_eq!(loaded.len(), adj.len());
        let original: Vec<_> = adj.ids().collect();
        let reloaded: Vec<_> = loaded.ids().collect();
        assert_eq!(reloaded, original);
        assert_eq!(loaded.get(3), adj.get(3));
    }

    #[test]
    fn test_adjacency_file_starts_with_header_comment() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("adjacency.jsonl");
        save_adjacency(&sample_adjacency(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# orgmine adjacency v1"));
    }

    #[test]
    fn test_load_skips_comments_and_blank_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("adjacency.jsonl");
        fs::write(
            &path,
            "# a comment\n\n{\"id\":3,\"reports\":[2]}\n{\"id\":2,\"managers\":[3]}\n",
        )
        .unwrap();

        let adj = load_adjacency(&path).unwrap();
        assert_eq!(adj.len(), 2);
        assert_eq!(adj.reports_of(3), &[2]);
        assert_eq!(adj.managers_of(2), &[3]);
    }

    #[test]
    fn test_load_reports_line_number_on_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("adjacency.jsonl");
        fs::write(&path, "{\"id\":1}\nnot json\n").unwrap();

        match load_adjacency(&path).unwrap_err() {
            StoreError::JsonLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_id_overwrites_earlier_entry() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("adjacency.jsonl");
        fs::write(
            &path,
            "{\"id\":1,\"managers\":[2]}\n{\"id\":1,\"managers\":[9]}\n",
        )
        .unwrap();

        let adj = load_adjacency(&path).unwrap();
        assert_eq!(adj.len(), 1);
        assert_eq!(adj.managers_of(1), &[9]);
    }

    #[test]
    fn test_forest_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("forest.json");
        let forest = extract_forest(&sample_adjacency()).unwrap();

        save_forest(&forest, &path).unwrap();
        let loaded = load_forest(&path).unwrap();
        assert_eq!(loaded, forest);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("forest.json");
        fs::write(
            &path,
            "{\"version\":99,\"generated_at\":\"2024-01-01T00:00:00Z\",\"trees\":{}}",
        )
        .unwrap();

        match load_forest(&path).unwrap_err() {
            StoreError::Version { version, .. } => assert_eq!(version, 99),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_labeled_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("roletrees.json");

        let mut tree = Tree::new(Role {
            name: "CEO".to_string(),
            description: "Runs the place".to_string(),
        });
        tree.insert(Role {
            name: "Engineer".to_string(),
            description: "Does the work".to_string(),
        });
        let mut trees = BTreeMap::new();
        trees.insert("deep".to_string(), tree);

        save_labeled(&trees, &path).unwrap();
        let loaded = load_labeled(&path).unwrap();
        assert_eq!(loaded, trees);
    }
}
