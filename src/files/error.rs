// ABOUTME: Error type shared by the hosts file and SSH config models
// ABOUTME: Separates IO failures on read/write from structural problems found while parsing

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target may already be truncated when this is returned.
    #[error("Failed writing file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: property '{key}' appears before any Host or Match block", path.display())]
    PropertyOutsideBlock {
        path: PathBuf,
        line: usize,
        key: String,
    },
}

pub type FileResult<T> = Result<T, FileError>;
