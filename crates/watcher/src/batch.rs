//! Concurrent line-count fan-out
//!
//! One task per file, joined behind a hard barrier: the batch returns only
//! once every count has completed. Results merge in the coordinating task,
//! so no map is shared between counters.

use ahash::AHashMap;
use linewatch_core::count_lines;
use std::path::PathBuf;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Count every path concurrently, returning the fully merged batch
///
/// A file that cannot be counted (deleted or unreadable between snapshot
/// and count) is logged and absent from the result; sibling counts are
/// unaffected. A panicked counting task is treated the same way.
pub async fn count_batch(paths: Vec<PathBuf>) -> AHashMap<PathBuf, u64> {
    let mut tasks = JoinSet::new();

    for path in paths {
        tasks.spawn_blocking(move || {
            debug!("counting {}", path.display());
            let outcome = count_lines(&path);
            (path, outcome)
        });
    }

    let mut counts = AHashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(lines))) => {
                counts.insert(path, lines);
            }
            Ok((path, Err(e))) => {
                warn!("skipping {}: {}", path.display(), e);
            }
            Err(e) => {
                warn!("line-count task panicked: {}", e);
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_counts_whole_batch() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, b"1\n2\n3\n").unwrap();
        fs::write(&b, b"1\n2\n3\n4\n5\n").unwrap();

        let counts = count_batch(vec![a.clone(), b.clone()]).await;
        assert_eq!(counts.get(&a), Some(&3));
        assert_eq!(counts.get(&b), Some(&5));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_siblings() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let gone = dir.path().join("gone.txt");
        fs::write(&a, b"1\n2\n").unwrap();

        let counts = count_batch(vec![a.clone(), gone.clone()]).await;
        assert_eq!(counts.get(&a), Some(&2));
        assert!(!counts.contains_key(&gone));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let counts = count_batch(Vec::new()).await;
        assert!(counts.is_empty());
    }
}
