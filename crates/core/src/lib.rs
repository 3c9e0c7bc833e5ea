//! Core data model for linewatch
//!
//! Snapshots of a matched file set, the four-way classification between
//! two snapshots, and the streaming line counter.

pub mod count;
pub mod diff;
pub mod snapshot;

pub use count::{count_lines, CountError};
pub use diff::{classify, merge, Classification};
pub use snapshot::{FileRecord, Snapshot};
