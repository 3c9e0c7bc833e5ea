//! Fixed-interval polling loop
//!
//! Scans the tree each tick, reconciles against the previous snapshot,
//! fans out line counting for new and modified files, and emits a report.

use crate::batch::count_batch;
use crate::scan::Scanner;
use crate::WatchConfig;
use anyhow::Result;
use linewatch_core::{classify, merge, Snapshot};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// What a poll cycle observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Initial (path, line count) values, sent once before the loop starts
    Startup(Vec<(PathBuf, u64)>),
    /// Changes observed by one tick
    Tick(TickReport),
}

/// Changes observed by one tick, each category sorted by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Newly observed files with their line counts
    pub new: Vec<(PathBuf, u64)>,
    /// Files no longer present (or no longer matching)
    pub deleted: Vec<PathBuf>,
    /// Modified files with their nonzero line-count delta
    pub modified: Vec<(PathBuf, i64)>,
}

impl TickReport {
    /// Check if the tick observed anything reportable
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// Fixed-interval poller
///
/// The only long-lived state is the previous snapshot, replaced once per
/// tick. Ticks never queue: the interval skips missed ticks, so a tick
/// firing while the previous reconciliation is still running is dropped
/// rather than buffered.
pub struct Poller {
    config: WatchConfig,
    scanner: Scanner,
    previous: Snapshot,
    report_tx: mpsc::Sender<Report>,
}

impl Poller {
    /// Create a poller; fails on a malformed glob pattern
    pub fn new(config: WatchConfig, report_tx: mpsc::Sender<Report>) -> Result<Self> {
        let scanner = Scanner::new(&config)?;
        Ok(Self {
            config,
            scanner,
            previous: Snapshot::new(),
            report_tx,
        })
    }

    /// Run the poll loop until the report receiver goes away
    pub async fn run(mut self) -> Result<()> {
        self.startup().await?;

        let mut timer = interval(self.config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "starting poll loop on {} (pattern: {}, interval: {:?})",
            self.config.root.display(),
            self.config.pattern,
            self.config.interval
        );

        loop {
            timer.tick().await;

            let report = self.tick().await;
            if report.is_empty() {
                debug!("tick: no changes");
                continue;
            }

            if self.report_tx.send(Report::Tick(report)).await.is_err() {
                debug!("report receiver dropped, stopping poll loop");
                return Ok(());
            }
        }
    }

    /// Build the initial snapshot, count every match, send start values
    async fn startup(&mut self) -> Result<()> {
        let current = self.scanner.snapshot();
        let classes = classify(&self.previous, &current);
        let counts = count_batch(classes.needs_count()).await;
        self.previous = merge(&self.previous, current, &classes, &counts);

        let mut values: Vec<(PathBuf, u64)> = Vec::with_capacity(self.previous.len());
        for path in self.previous.sorted_paths() {
            if let Some(lines) = self.previous.get(&path).and_then(|r| r.line_count) {
                values.push((path, lines));
            }
        }

        self.report_tx
            .send(Report::Startup(values))
            .await
            .map_err(|_| anyhow::anyhow!("report receiver dropped during startup"))
    }

    /// One poll-compare-report cycle
    async fn tick(&mut self) -> TickReport {
        let current = self.scanner.snapshot();
        let classes = classify(&self.previous, &current);

        debug!(
            "tick: {} new, {} deleted, {} modified, {} unchanged",
            classes.new.len(),
            classes.deleted.len(),
            classes.modified.len(),
            classes.unchanged.len()
        );

        let counts = count_batch(classes.needs_count()).await;

        let mut report = TickReport::default();

        for path in &classes.new {
            if let Some(&lines) = counts.get(path) {
                report.new.push((path.clone(), lines));
            }
        }

        report.deleted = classes.deleted.clone();

        for path in &classes.modified {
            let previous_count = self.previous.get(path).and_then(|r| r.line_count);
            let (Some(before), Some(&after)) = (previous_count, counts.get(path)) else {
                continue;
            };
            let delta = after as i64 - before as i64;
            if delta != 0 {
                report.modified.push((path.clone(), delta));
            }
        }

        self.previous = merge(&self.previous, current, &classes, &counts);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn poller(root: &std::path::Path, pattern: &str) -> (Poller, mpsc::Receiver<Report>) {
        let (tx, rx) = mpsc::channel(10);
        let config = WatchConfig::new(root.to_path_buf(), pattern)
            .with_interval(Duration::from_millis(50));
        (Poller::new(config, tx).unwrap(), rx)
    }

    fn bump_mtime(path: &std::path::Path, ahead_secs: u64) {
        let future = SystemTime::now() + Duration::from_secs(ahead_secs);
        set_file_mtime(path, FileTime::from_system_time(future)).unwrap();
    }

    #[tokio::test]
    async fn test_startup_reports_initial_counts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"1\n2\n3\n").unwrap();
        fs::write(dir.path().join("b.txt"), b"1\n").unwrap();

        let (mut poller, mut rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        match rx.recv().await.unwrap() {
            Report::Startup(values) => {
                assert_eq!(
                    values,
                    vec![(dir.path().join("a.txt"), 3), (dir.path().join("b.txt"), 1)]
                );
            }
            other => panic!("expected startup report, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_new_file_reported_with_count() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"1\n2\n3\n").unwrap();

        let (mut poller, _rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        fs::write(dir.path().join("b.txt"), b"1\n2\n3\n4\n5\n").unwrap();

        let report = poller.tick().await;
        assert_eq!(report.new, vec![(dir.path().join("b.txt"), 5)]);
        assert!(report.deleted.is_empty());
        assert!(report.modified.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_file_reported_by_path() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, b"1\n2\n3\n").unwrap();

        let (mut poller, _rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        fs::remove_file(&a).unwrap();

        let report = poller.tick().await;
        assert_eq!(report.deleted, vec![a]);
        assert!(report.new.is_empty());
    }

    #[tokio::test]
    async fn test_modified_file_reports_delta() {
        let dir = TempDir::new().unwrap();
        let b = dir.path().join("b.txt");
        fs::write(&b, b"1\n2\n3\n4\n5\n").unwrap();

        let (mut poller, _rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        fs::write(&b, b"1\n2\n3\n4\n5\n6\n7\n").unwrap();
        bump_mtime(&b, 2);

        let report = poller.tick().await;
        assert_eq!(report.modified, vec![(b, 2)]);
    }

    #[tokio::test]
    async fn test_shrunk_file_reports_negative_delta() {
        let dir = TempDir::new().unwrap();
        let b = dir.path().join("b.txt");
        fs::write(&b, b"1\n2\n3\n4\n5\n").unwrap();

        let (mut poller, _rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        fs::write(&b, b"1\n2\n").unwrap();
        bump_mtime(&b, 2);

        let report = poller.tick().await;
        assert_eq!(report.modified, vec![(b, -3)]);
    }

    #[tokio::test]
    async fn test_touch_without_edit_is_suppressed() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, b"1\n2\n3\n").unwrap();

        let (mut poller, _rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        // mtime advances, content does not
        bump_mtime(&a, 2);

        let report = poller.tick().await;
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_count_not_recomputed_across_ticks() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, b"1\n2\n3\n").unwrap();

        let (mut poller, _rx) = poller(dir.path(), "*.txt");
        poller.startup().await.unwrap();

        let report = poller.tick().await;
        assert!(report.is_empty());
        // Carried forward, not re-derived from the bare walk record
        assert_eq!(poller.previous.get(&a).unwrap().line_count, Some(3));
    }

    #[tokio::test]
    async fn test_non_matching_files_never_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.go"), b"package main\n").unwrap();
        fs::write(dir.path().join("x.txt"), b"hello\n").unwrap();

        let (mut poller, mut rx) = poller(dir.path(), "*.go");
        poller.startup().await.unwrap();

        match rx.recv().await.unwrap() {
            Report::Startup(values) => {
                assert_eq!(values.len(), 1);
                assert_eq!(values[0].0, dir.path().join("x.go"));
            }
            other => panic!("expected startup report, got {:?}", other),
        }

        fs::write(dir.path().join("x.txt"), b"hello\nworld\n").unwrap();
        bump_mtime(&dir.path().join("x.txt"), 2);

        let report = poller.tick().await;
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_run_loop_delivers_reports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"1\n2\n3\n").unwrap();

        let (poller, mut rx) = poller(dir.path(), "*.txt");
        tokio::spawn(poller.run());

        let startup = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(startup, Report::Startup(_)));

        let b = dir.path().join("b.txt");
        fs::write(&b, b"1\n2\n3\n4\n5\n").unwrap();
        bump_mtime(&b, 2);

        let tick = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match tick {
            Report::Tick(report) => assert_eq!(report.new, vec![(b, 5)]),
            other => panic!("expected tick report, got {:?}", other),
        }
    }
}
