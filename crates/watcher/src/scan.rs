//! Snapshot builder
//!
//! Walks a directory tree and builds a snapshot of every regular file
//! whose base name matches the configured glob.

use crate::WatchConfig;
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use linewatch_core::{FileRecord, Snapshot};
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

/// Glob-filtered directory scanner
///
/// The glob is compiled once at construction; a malformed pattern is a
/// startup error, not a per-entry one.
pub struct Scanner {
    root: PathBuf,
    matcher: GlobMatcher,
}

impl Scanner {
    /// Compile the glob and create a scanner
    pub fn new(config: &WatchConfig) -> Result<Self> {
        let matcher = Glob::new(&config.pattern)
            .with_context(|| format!("invalid glob pattern '{}'", config.pattern))?
            .compile_matcher();

        Ok(Self {
            root: config.root.clone(),
            matcher,
        })
    }

    /// Build a snapshot of the matched file set right now
    ///
    /// Per-entry walk errors and unreadable metadata are logged and
    /// skipped; the walk continues past them. Directories never match.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("skipping walk entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            // Match the base name only, never the full path
            if !self.matcher.is_match(entry.file_name()) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("skipping {}: unreadable metadata: {}", entry.path().display(), e);
                    continue;
                }
            };
            let mod_time = match metadata.modified() {
                Ok(mtime) => mtime,
                Err(e) => {
                    debug!("skipping {}: no modification time: {}", entry.path().display(), e);
                    continue;
                }
            };

            snapshot.insert(FileRecord::observed(entry.path().to_path_buf(), mod_time));
        }

        snapshot
    }
}
