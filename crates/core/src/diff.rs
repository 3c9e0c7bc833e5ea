//! Snapshot reconciliation
//!
//! Diffs two snapshots into new/deleted/modified/unchanged classifications
//! and merges freshly computed line counts into the next snapshot.

use crate::snapshot::Snapshot;
use ahash::AHashMap;
use std::path::PathBuf;

/// Four-way classification of paths between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Present in current, absent in previous
    pub new: Vec<PathBuf>,
    /// Present in previous, absent in current
    pub deleted: Vec<PathBuf>,
    /// Present in both, mod time strictly advanced
    pub modified: Vec<PathBuf>,
    /// Present in both, mod time not advanced
    pub unchanged: Vec<PathBuf>,
}

impl Classification {
    /// Check if there are any reportable changes
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// Paths whose line counts must be (re)computed this tick
    pub fn needs_count(&self) -> Vec<PathBuf> {
        self.new
            .iter()
            .chain(self.modified.iter())
            .cloned()
            .collect()
    }
}

/// Classify every path across two snapshots
///
/// Never mutates its inputs; classifying the same pair twice yields the
/// same sets. A path whose mod time regressed (clock skew, restored backup)
/// is treated as unchanged: only a strict advance marks a modification.
/// Each category comes back sorted by path.
pub fn classify(previous: &Snapshot, current: &Snapshot) -> Classification {
    let mut classes = Classification::default();

    for (path, record) in current.iter() {
        match previous.get(path) {
            None => classes.new.push(path.clone()),
            Some(prev) if record.mod_time > prev.mod_time => {
                classes.modified.push(path.clone())
            }
            Some(_) => classes.unchanged.push(path.clone()),
        }
    }

    for (path, _) in previous.iter() {
        if !current.contains(path) {
            classes.deleted.push(path.clone());
        }
    }

    classes.new.sort();
    classes.deleted.sort();
    classes.modified.sort();
    classes.unchanged.sort();
    classes
}

/// Build the next previous-snapshot from a tick's results
///
/// Starts from the raw current snapshot, then:
/// - unchanged paths carry forward the previous record, preserving the
///   line count computed on an earlier tick (never recomputed);
/// - new and modified paths take their freshly computed count;
/// - a new path whose count failed is dropped, so the next tick retries
///   it as new;
/// - a modified path whose count failed keeps the previous record
///   wholesale (old mod time included), so the next tick re-detects the
///   modification and retries the count.
///
/// Deleted paths are absent from the current snapshot already.
pub fn merge(
    previous: &Snapshot,
    mut current: Snapshot,
    classes: &Classification,
    counts: &AHashMap<PathBuf, u64>,
) -> Snapshot {
    for path in &classes.unchanged {
        if let Some(record) = previous.get(path) {
            current.insert(record.clone());
        }
    }

    for path in &classes.new {
        match counts.get(path) {
            Some(&n) => {
                if let Some(record) = current.get_mut(path) {
                    record.line_count = Some(n);
                }
            }
            None => {
                current.remove(path);
            }
        }
    }

    for path in &classes.modified {
        match counts.get(path) {
            Some(&n) => {
                if let Some(record) = current.get_mut(path) {
                    record.line_count = Some(n);
                }
            }
            None => {
                if let Some(record) = previous.get(path) {
                    current.insert(record.clone());
                }
            }
        }
    }

    current
}
