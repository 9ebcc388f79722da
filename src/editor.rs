// ABOUTME: Opens the managed files in an external editor chosen from flags, settings or $EDITOR
// ABOUTME: Validates explicit editors against $PATH and waits for each editing session to finish

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

const FALLBACK_EDITOR: &str = "vi";

pub struct EditorLauncher {
    program: PathBuf,
}

impl EditorLauncher {
    /// Picks the editor in order: explicit argument, settings file, `$EDITOR`, `vi`.
    /// Only the explicit argument has to resolve on `$PATH` up front.
    pub fn resolve(explicit: Option<&str>, configured: Option<&str>, env_editor: Option<&str>) -> Result<Self> {
        if let Some(name) = explicit {
            let program = which::which(name).map_err(|e| {
                tracing::debug!("Lookup of '{}' failed: {}", name, e);
                anyhow::anyhow!("Executable '{name}' not found in $PATH. Try nano or vi!")
            })?;
            return Ok(Self { program });
        }

        let name = configured
            .or(env_editor)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_EDITOR);

        Ok(Self {
            program: PathBuf::from(name),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the editor on `path` with the terminal attached and blocks until it exits.
    pub fn edit(&self, path: &Path) -> Result<()> {
        tracing::debug!("Opening {} with {}", path.display(), self.program.display());

        let status = Command::new(&self.program)
            .arg(path)
            .status()
            .with_context(|| format!("Error opening file with {}", self.program.display()))?;

        if !status.success() {
            bail!(
                "Editor {} exited with {} while editing {}",
                self.program.display(),
                status,
                path.display()
            );
        }

        tracing::info!("Finished editing {}", path.display());
        Ok(())
    }
}
