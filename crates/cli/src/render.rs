//! Fixed-format report rendering
//!
//! Sign policy: modified deltas always carry an explicit sign (`+2`, `-3`);
//! zero deltas never reach a report.

use std::fmt::Write;
use watcher::{Report, TickReport};

/// Render a report as the lines to print, in report order
pub fn render(report: &Report) -> String {
    match report {
        Report::Startup(values) => {
            let mut out = String::new();
            for (path, count) in values {
                let _ = writeln!(out, "Start values: {} {}", path.display(), count);
            }
            out
        }
        Report::Tick(tick) => render_tick(tick),
    }
}

/// New files first, then deletions, then deltas
fn render_tick(tick: &TickReport) -> String {
    let mut out = String::new();
    for (path, count) in &tick.new {
        let _ = writeln!(out, "New: {}: {}", path.display(), count);
    }
    for path in &tick.deleted {
        let _ = writeln!(out, "Deleted: {}", path.display());
    }
    for (path, delta) in &tick.modified {
        let _ = writeln!(out, "{} {:+}", path.display(), delta);
    }
    out
}
