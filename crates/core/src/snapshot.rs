//! Snapshot representation of a matched file set

use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata for one matched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as produced by the directory walk (root-joined)
    pub path: PathBuf,
    /// Modification time at snapshot instant
    pub mod_time: SystemTime,
    /// Newline-delimited line count; `None` until the counting step runs
    pub line_count: Option<u64>,
}

impl FileRecord {
    /// Create a record fresh from a directory walk, count not yet computed
    pub fn observed(path: PathBuf, mod_time: SystemTime) -> Self {
        Self {
            path,
            mod_time,
            line_count: None,
        }
    }
}

/// The complete set of pattern-matching files as observed at one poll instant
///
/// Keyed by path, keys unique. No ordering guarantee; use
/// [`Snapshot::sorted_paths`] when deterministic order matters.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: AHashMap<PathBuf, FileRecord>,
}

impl Snapshot {
    /// Create a new empty snapshot
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Insert a record, replacing any existing record for the same path
    pub fn insert(&mut self, record: FileRecord) {
        self.entries.insert(record.path.clone(), record);
    }

    /// Get the record for a path
    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    /// Get a mutable record for a path
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut FileRecord> {
        self.entries.get_mut(path)
    }

    /// Remove the record for a path
    pub fn remove(&mut self, path: &Path) -> Option<FileRecord> {
        self.entries.remove(path)
    }

    /// Check whether a path is present
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of records in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over records in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileRecord)> {
        self.entries.iter()
    }

    /// All paths, sorted lexicographically
    pub fn sorted_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.entries.keys().cloned().collect();
        paths.sort();
        paths
    }
}
