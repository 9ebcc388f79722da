// ABOUTME: Hosts file model with line parsing, add/remove of mappings and ordered rendering
// ABOUTME: Keeps the loopback and broadcast entries on top and protected from removal by name

use super::{FileResult, overwrite, read_content};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// Aliases that never trigger removal of an entry.
pub const PROTECTED_NAMES: [&str; 2] = ["localhost", "broadcasthost"];

/// Addresses rendered ahead of every other entry.
pub const PRIORITY_ADDRESSES: [&str; 3] = ["127.0.0.1", "255.255.255.255", "::1"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostEntry {
    pub address: String,
    pub aliases: Vec<String>,
    /// Text after the first `#`, without the `#` itself.
    pub comment: String,
}

impl HostEntry {
    pub fn new(address: String, aliases: Vec<String>) -> Self {
        Self {
            address,
            aliases,
            comment: String::new(),
        }
    }

    pub fn is_priority(&self) -> bool {
        PRIORITY_ADDRESSES.contains(&self.address.as_str())
    }

    fn parse_line(line: &str) -> Option<Self> {
        let (entry, comment) = match line.split_once('#') {
            Some((entry, comment)) => (entry, comment.trim_end()),
            None => (line, ""),
        };

        let mut fields = entry.split_whitespace();
        let address = fields.next()?;

        Some(Self {
            address: address.to_string(),
            aliases: fields.map(str::to_string).collect(),
            comment: comment.to_string(),
        })
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)?;
        for alias in &self.aliases {
            write!(f, " {alias}")?;
        }
        if !self.comment.is_empty() {
            write!(f, " #{}", self.comment)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostsFile {
    path: PathBuf,
    pub entries: Vec<HostEntry>,
}

impl HostsFile {
    pub fn read(path: &Path) -> FileResult<Self> {
        let content = read_content(path)?;
        Ok(Self::parse_content(path, &content))
    }

    /// Blank and comment-only lines produce no entry.
    pub fn parse_content(path: &Path, content: &str) -> Self {
        let entries = content.lines().filter_map(HostEntry::parse_line).collect();

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_host(&mut self, address: &str, aliases: Vec<String>) {
        tracing::debug!("Adding hosts entry {} -> {:?}", address, aliases);
        self.entries.push(HostEntry::new(address.to_string(), aliases));
    }

    /// Moves every entry carrying one of `names` as an alias into the returned list.
    /// Protected names are dropped from `names` before matching.
    pub fn remove_hosts<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<HostEntry> {
        let candidates: Vec<&str> = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| {
                let protected = PROTECTED_NAMES.contains(name);
                if protected {
                    tracing::warn!("'{}' is a required hosts entry and will not be removed", name);
                }
                !protected
            })
            .collect();

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| {
                entry
                    .aliases
                    .iter()
                    .any(|alias| candidates.contains(&alias.as_str()))
            });

        self.entries = kept;
        removed
    }

    pub fn list_hosts(&self) -> Vec<&[String]> {
        self.entries.iter().map(|entry| entry.aliases.as_slice()).collect()
    }

    /// Priority addresses first in their current order, then the rest by
    /// descending address.
    pub fn sort_entries(&mut self) {
        self.entries.sort_by(|a, b| match (a.is_priority(), b.is_priority()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => b.address.cmp(&a.address),
        });
    }

    /// Sorts, then overwrites the file at `path` with the rendered entries.
    pub fn write(&mut self) -> FileResult<()> {
        self.sort_entries();
        overwrite(&self.path, &self.to_string())
    }
}

impl fmt::Display for HostsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
