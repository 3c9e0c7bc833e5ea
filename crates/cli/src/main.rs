//! Linewatch CLI - lw command

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use cli_lib::render;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use watcher::{Poller, WatchConfig};

/// Linewatch - poll a directory tree and report line-count changes
#[derive(Parser)]
#[command(name = "lw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root directory to poll
    root: PathBuf,

    /// Shell-style glob matched against file base names (e.g. '*.txt')
    pattern: String,

    /// Poll period in seconds
    #[arg(long, default_value = "5")]
    interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Missing positionals print usage and exit cleanly, without entering
    // the polling loop
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument | ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ) =>
        {
            e.print()?;
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    let config = WatchConfig::new(cli.root, cli.pattern)
        .with_interval(Duration::from_secs(cli.interval_secs));

    let (report_tx, mut report_rx) = mpsc::channel(16);
    let poller = Poller::new(config, report_tx)?;
    tokio::spawn(poller.run());

    while let Some(report) = report_rx.recv().await {
        print!("{}", render::render(&report));
    }

    Ok(())
}
