// ABOUTME: Settings file structures and the per-invocation context passed to every command
// ABOUTME: Loads optional TOML defaults, expands home paths and lets command-line flags override them

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub ssh: SshDefaults,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_hosts_file")]
    pub hosts_file: String,
    #[serde(default = "default_ssh_config")]
    pub ssh_config: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SshDefaults {
    #[serde(default)]
    pub default_user: String,
    #[serde(default)]
    pub default_identity_file: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct EditorConfig {
    /// Empty means fall back to `$EDITOR`, then `vi`.
    #[serde(default)]
    pub program: String,
}

fn default_hosts_file() -> String {
    "/etc/hosts".to_string()
}

fn default_ssh_config() -> String {
    "~/.ssh/config".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig {
                hosts_file: default_hosts_file(),
                ssh_config: default_ssh_config(),
            },
            ssh: SshDefaults::default(),
            editor: EditorConfig::default(),
        }
    }
}

impl Config {
    pub fn default_config_content() -> &'static str {
        r#"# addh configuration

[paths]
# Files that add/rm/print/list/edit operate on
hosts_file = "/etc/hosts"
ssh_config = "~/.ssh/config"

[ssh]
# Used for new Host blocks when --user / --identity-file are not given
default_user = ""
default_identity_file = ""

[editor]
# Editor for `addh edit`; empty falls back to $EDITOR, then vi
program = ""
"#
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Loads `path` if given, otherwise the default location when it exists,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("No config directory available, using defaults: {e}");
                Ok(Self::default())
            }
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("addh").join("config.toml"))
    }

    pub fn expand_path(&mut self) -> Result<()> {
        self.paths.hosts_file = expand_tilde(&self.paths.hosts_file)?;
        self.paths.ssh_config = expand_tilde(&self.paths.ssh_config)?;
        self.ssh.default_identity_file = expand_tilde(&self.ssh.default_identity_file)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.paths.hosts_file.trim().is_empty() {
            anyhow::bail!("hosts_file path cannot be empty");
        }
        if self.paths.ssh_config.trim().is_empty() {
            anyhow::bail!("ssh_config path cannot be empty");
        }
        Ok(())
    }

    pub fn save_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config to: {}", path.display()))?;

        Ok(())
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}

/// Overrides taken from the command line. `None` keeps the settings file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub hosts_file: Option<PathBuf>,
    pub ssh_config: Option<PathBuf>,
    pub dry_run: bool,
}

/// Everything a command needs to know about the current invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub hosts_file: PathBuf,
    pub ssh_config: PathBuf,
    pub dry_run: bool,
    pub default_user: Option<String>,
    pub default_identity_file: Option<String>,
    pub editor: Option<String>,
}

impl Context {
    pub fn resolve(mut config: Config, overrides: Overrides) -> Result<Self> {
        config.expand_path()?;
        config.validate()?;

        let non_empty = |value: String| (!value.is_empty()).then_some(value);

        let hosts_file = match overrides.hosts_file {
            Some(path) => PathBuf::from(expand_tilde(&path.to_string_lossy())?),
            None => PathBuf::from(config.paths.hosts_file),
        };
        let ssh_config = match overrides.ssh_config {
            Some(path) => PathBuf::from(expand_tilde(&path.to_string_lossy())?),
            None => PathBuf::from(config.paths.ssh_config),
        };

        Ok(Self {
            hosts_file,
            ssh_config,
            dry_run: overrides.dry_run,
            default_user: non_empty(config.ssh.default_user),
            default_identity_file: non_empty(config.ssh.default_identity_file),
            editor: non_empty(config.editor.program),
        })
    }
}
