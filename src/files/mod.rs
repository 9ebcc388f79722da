// ABOUTME: In-memory models for the hosts file and the SSH client config
// ABOUTME: Each model reads, mutates, renders and overwrites its file independently of the other

pub mod error;
pub mod hosts;
pub mod ssh_config;

pub use error::{FileError, FileResult};
pub use hosts::{HostEntry, HostsFile};
pub use ssh_config::{BlockKind, ConfigBlock, SshConfig};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Truncate `path` and write `content` in place. Not atomic: a failure part way
/// through leaves the file empty or partially written.
pub(crate) fn overwrite(path: &Path, content: &str) -> FileResult<()> {
    let to_error = |source| FileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(to_error)?;
    file.write_all(content.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)?;

    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

pub(crate) fn read_content(path: &Path) -> FileResult<String> {
    let content = std::fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}
