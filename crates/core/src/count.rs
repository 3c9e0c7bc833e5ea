//! Streaming line counter

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-file counting failure
///
/// A file may be deleted or lose read permission between the snapshot walk
/// and the counting step; callers decide whether to skip or abort.
#[derive(Debug, Error)]
pub enum CountError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Count newline-delimited lines in a file by streaming
///
/// Never loads the whole file into memory. A final line without a trailing
/// newline counts as a line; an empty file has zero lines.
pub fn count_lines(path: &Path) -> Result<u64, CountError> {
    let file = File::open(path).map_err(|source| CountError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut buffer = [0u8; 8192]; // 8KB buffer
    let mut lines = 0u64;
    let mut last_byte = None;

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|source| CountError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes_read == 0 {
            break;
        }
        lines += buffer[..bytes_read].iter().filter(|&&b| b == b'\n').count() as u64;
        last_byte = Some(buffer[bytes_read - 1]);
    }

    // Unterminated final line still counts
    if last_byte.is_some_and(|b| b != b'\n') {
        lines += 1;
    }

    Ok(lines)
}
