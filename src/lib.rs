// ABOUTME: Library root for editing host/address mappings in the hosts file and SSH client config
// ABOUTME: Exposes the file models, settings, editor launcher and command operations used by the binary

pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod files;
pub mod logging;

pub use files::{BlockKind, ConfigBlock, FileError, HostEntry, HostsFile, SshConfig};
