// ABOUTME: Command-line definitions for adding, removing, printing and editing host mappings
// ABOUTME: Turns global flags into config overrides so commands never read flags directly

use crate::config::Overrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "addh", version)]
#[command(about = "Manage host/ip mappings of '/etc/hosts' and '~/.ssh/config' with one command.")]
pub struct CommandLine {
    /// Hosts file to operate on (default: /etc/hosts)
    #[arg(long, global = true, value_name = "PATH")]
    pub hosts_file: Option<PathBuf>,

    /// SSH config file to operate on (default: ~/.ssh/config)
    #[arg(long, global = true, value_name = "PATH")]
    pub ssh_config: Option<PathBuf>,

    /// Settings file (default: <config dir>/addh/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print the updated files instead of writing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add an address mapping to the ssh config and hosts file. Don't forget the sudo!
    Add {
        /// IP or domain the aliases point to
        address: String,
        /// One or more host names
        #[arg(required = true)]
        aliases: Vec<String>,
        /// Set 'User' for the new SSH config block
        #[arg(short, long)]
        user: Option<String>,
        /// Set 'IdentityFile' for the new SSH config block
        #[arg(short, long, value_name = "PATH")]
        identity_file: Option<String>,
    },
    /// Remove host entries from the ssh config and hosts file
    #[command(alias = "remove")]
    Rm {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print contents of the ssh config and hosts file
    Print,
    /// List the host names of every hosts entry and ssh config block
    #[command(alias = "ls")]
    List,
    /// Open the ssh config, and optionally the hosts file, in an editor
    Edit {
        /// Editor executable; falls back to the settings file, $EDITOR, then vi
        editor: Option<String>,
        /// Edit the hosts file first
        #[arg(long)]
        etc_hosts: bool,
    },
    /// Write a default settings file if none exists
    InitConfig,
    /// Print version information
    Version,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            hosts_file: self.hosts_file.clone(),
            ssh_config: self.ssh_config.clone(),
            dry_run: self.dry_run,
        }
    }
}
