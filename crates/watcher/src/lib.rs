//! Polling directory watcher for linewatch
//!
//! This crate provides:
//! - Glob-filtered snapshot scanning (walk + base-name match)
//! - Concurrent line-count fan-out with a hard join barrier
//! - The fixed-interval polling loop that reconciles snapshots

pub mod batch;
pub mod poll;
pub mod scan;

pub use poll::{Poller, Report, TickReport};
pub use scan::Scanner;

use std::path::PathBuf;
use std::time::Duration;

/// Default poll period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Watch configuration, read once at startup and passed explicitly
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Root directory to walk
    pub root: PathBuf,
    /// Shell-style glob matched against file base names
    pub pattern: String,
    /// Poll period
    pub interval: Duration,
}

impl WatchConfig {
    /// Create a config with the default poll interval
    pub fn new(root: PathBuf, pattern: impl Into<String>) -> Self {
        Self {
            root,
            pattern: pattern.into(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}
