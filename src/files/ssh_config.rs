// ABOUTME: SSH client config model made of Host/Match blocks with ordered key/value properties
// ABOUTME: Parses, appends and removes blocks and renders them back in insertion order

use super::{FileError, FileResult, overwrite, read_content};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Host,
    Match,
}

impl BlockKind {
    /// Recognises a block keyword regardless of case.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("host") {
            Some(BlockKind::Host)
        } else if keyword.eq_ignore_ascii_case("match") {
            Some(BlockKind::Match)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Host => "Host",
            BlockKind::Match => "Match",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigBlock {
    pub kind: BlockKind,
    pub patterns: Vec<String>,
    /// Key/value pairs in file order. Repeated keys are kept as separate pairs.
    pub properties: Vec<(String, String)>,
}

impl ConfigBlock {
    pub fn new(kind: BlockKind, patterns: Vec<String>) -> Self {
        Self {
            kind,
            patterns,
            properties: Vec::new(),
        }
    }

    pub fn push_property(&mut self, key: &str, value: &str) {
        self.properties.push((key.to_string(), value.to_string()));
    }

    /// First value for `key`, compared case-insensitively like ssh does.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn matches_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.patterns
            .iter()
            .any(|pattern| names.iter().any(|name| name.as_ref() == pattern))
    }
}

impl fmt::Display for ConfigBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        for pattern in &self.patterns {
            write!(f, " {pattern}")?;
        }
        writeln!(f)?;

        for (key, value) in &self.properties {
            if value.is_empty() {
                writeln!(f, "  {key}")?;
            } else {
                writeln!(f, "  {key} {value}")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SshConfig {
    path: PathBuf,
    pub blocks: Vec<ConfigBlock>,
}

impl SshConfig {
    pub fn read(path: &Path) -> FileResult<Self> {
        let content = read_content(path)?;
        Self::parse_content(path, &content)
    }

    /// Comments and blank lines are dropped. A property line that shows up
    /// before the first `Host`/`Match` line is rejected.
    pub fn parse_content(path: &Path, content: &str) -> FileResult<Self> {
        let mut blocks: Vec<ConfigBlock> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(key) = fields.next() else {
                continue;
            };
            if key.starts_with('#') {
                continue;
            }

            if let Some(kind) = BlockKind::from_keyword(key) {
                blocks.push(ConfigBlock::new(kind, fields.map(str::to_string).collect()));
                continue;
            }

            let value = fields.collect::<Vec<_>>().join(" ");
            match blocks.last_mut() {
                Some(block) => block.push_property(key, &value),
                None => {
                    return Err(FileError::PropertyOutsideBlock {
                        path: path.to_path_buf(),
                        line: index + 1,
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            blocks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a `Host` block. `user` and `identity_file` are skipped when absent or empty.
    pub fn add_host(
        &mut self,
        patterns: Vec<String>,
        hostname: &str,
        user: Option<&str>,
        identity_file: Option<&str>,
    ) {
        let mut block = ConfigBlock::new(BlockKind::Host, patterns);
        block.push_property("HostName", hostname);
        if let Some(user) = user.filter(|u| !u.is_empty()) {
            block.push_property("User", user);
        }
        if let Some(identity_file) = identity_file.filter(|i| !i.is_empty()) {
            block.push_property("IdentityFile", identity_file);
        }

        tracing::debug!("Adding ssh config block {:?} -> {}", block.patterns, hostname);
        self.blocks.push(block);
    }

    pub fn remove_hosts<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<ConfigBlock> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.blocks)
            .into_iter()
            .partition(|block| block.matches_any(names));

        self.blocks = kept;
        removed
    }

    pub fn list_hosts(&self) -> Vec<&[String]> {
        self.blocks.iter().map(|block| block.patterns.as_slice()).collect()
    }

    pub fn write(&self) -> FileResult<()> {
        overwrite(&self.path, &self.to_string())
    }
}

impl fmt::Display for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{block}")?;
        }
        Ok(())
    }
}
