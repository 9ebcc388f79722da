// ABOUTME: Command operations that load both managed files, apply one change and persist or preview it
// ABOUTME: Every operation takes the resolved Context explicitly and writes its output to a caller-supplied sink

use crate::config::{Config, Context};
use crate::editor::EditorLauncher;
use crate::files::{HostsFile, SshConfig};
use anyhow::{Context as _, Result};
use std::io::Write;
use std::path::Path;

const SSH_SPACER: &str = "\n--\n";

fn load(ctx: &Context) -> Result<(HostsFile, SshConfig)> {
    let hosts = HostsFile::read(&ctx.hosts_file)?;
    let ssh_config = SshConfig::read(&ctx.ssh_config)?;
    Ok((hosts, ssh_config))
}

fn print_hosts(out: &mut impl Write, hosts: &mut HostsFile) -> Result<()> {
    hosts.sort_entries();
    write!(out, "{}:\n{}", hosts.path().display(), hosts)?;
    Ok(())
}

fn print_ssh_config(out: &mut impl Write, ssh_config: &SshConfig) -> Result<()> {
    write!(out, "{SSH_SPACER}{}:\n{}", ssh_config.path().display(), ssh_config)?;
    Ok(())
}

/// Writes both files, or prints what would be written when running dry.
fn persist(ctx: &Context, hosts: &mut HostsFile, ssh_config: &SshConfig, out: &mut impl Write) -> Result<()> {
    if ctx.dry_run {
        print_hosts(out, hosts)?;
        return print_ssh_config(out, ssh_config);
    }

    hosts.write()?;
    tracing::info!("Updated {}", hosts.path().display());
    ssh_config.write()?;
    tracing::info!("Updated {}", ssh_config.path().display());
    Ok(())
}

pub fn add(
    ctx: &Context,
    address: &str,
    aliases: &[String],
    user: Option<&str>,
    identity_file: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let (mut hosts, mut ssh_config) = load(ctx)?;

    hosts.add_host(address, aliases.to_vec());
    ssh_config.add_host(
        aliases.to_vec(),
        address,
        user.or(ctx.default_user.as_deref()),
        identity_file.or(ctx.default_identity_file.as_deref()),
    );

    persist(ctx, &mut hosts, &ssh_config, out)
}

pub fn remove(ctx: &Context, names: &[String], out: &mut impl Write) -> Result<()> {
    let (mut hosts, mut ssh_config) = load(ctx)?;

    for entry in hosts.remove_hosts(names) {
        tracing::info!("Removed hosts entry: {}", entry);
    }
    for block in ssh_config.remove_hosts(names) {
        tracing::info!("Removed ssh config block: {} {}", block.kind, block.patterns.join(" "));
    }

    persist(ctx, &mut hosts, &ssh_config, out)
}

pub fn print(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let (mut hosts, ssh_config) = load(ctx)?;

    print_hosts(out, &mut hosts)?;
    print_ssh_config(out, &ssh_config)
}

pub fn list(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let (hosts, ssh_config) = load(ctx)?;

    writeln!(out, "{}:", hosts.path().display())?;
    for (i, aliases) in hosts.list_hosts().iter().enumerate() {
        writeln!(out, "{i}: {}", aliases.join(" "))?;
    }

    write!(out, "{SSH_SPACER}{}:\n", ssh_config.path().display())?;
    for (i, patterns) in ssh_config.list_hosts().iter().enumerate() {
        writeln!(out, "{i}: {}", patterns.join(" "))?;
    }
    Ok(())
}

/// Opens the SSH config, preceded by the hosts file when `include_hosts` is set.
pub fn edit(ctx: &Context, explicit_editor: Option<&str>, include_hosts: bool) -> Result<()> {
    let env_editor = std::env::var("EDITOR").ok();
    let launcher = EditorLauncher::resolve(explicit_editor, ctx.editor.as_deref(), env_editor.as_deref())?;

    if include_hosts {
        launcher.edit(&ctx.hosts_file)?;
    }
    launcher.edit(&ctx.ssh_config)
}

pub fn init_config(path: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    if path.exists() {
        writeln!(out, "Configuration already exists at {}", path.display())?;
        return Ok(());
    }

    Config::save_default_config(&path)?;
    writeln!(out, "Wrote default configuration to {}", path.display())?;
    Ok(())
}

pub fn version(out: &mut impl Write) -> Result<()> {
    let repository = env!("CARGO_PKG_REPOSITORY");
    writeln!(
        out,
        "{} version {}\n\nView on GitHub > {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        repository
    )
    .context("Failed to print version")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        hosts_file: PathBuf,
        ssh_config: PathBuf,
    }

    impl Fixture {
        fn new(hosts: &str, ssh_config: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let hosts_file = dir.path().join("hosts");
            let ssh_config_path = dir.path().join("config");
            fs::write(&hosts_file, hosts).unwrap();
            fs::write(&ssh_config_path, ssh_config).unwrap();

            Self {
                _dir: dir,
                hosts_file,
                ssh_config: ssh_config_path,
            }
        }

        fn context(&self, dry_run: bool) -> Context {
            Context {
                hosts_file: self.hosts_file.clone(),
                ssh_config: self.ssh_config.clone(),
                dry_run,
                default_user: None,
                default_identity_file: None,
                editor: None,
            }
        }

        fn hosts(&self) -> String {
            fs::read_to_string(&self.hosts_file).unwrap()
        }

        fn ssh_config(&self) -> String {
            fs::read_to_string(&self.ssh_config).unwrap()
        }
    }

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_add_writes_both_files() {
        let fixture = Fixture::new(
            "127.0.0.1 localhost\n10.0.0.2 foo\n10.0.0.9 bar\n",
            "Host foo\n  HostName 10.0.0.2\n",
        );
        let mut out = Vec::new();

        add(&fixture.context(false), "10.0.0.5", &aliases(&["baz"]), Some("admin"), None, &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(
            fixture.hosts(),
            "127.0.0.1 localhost\n10.0.0.9 bar\n10.0.0.5 baz\n10.0.0.2 foo\n"
        );
        assert_eq!(
            fixture.ssh_config(),
            "Host foo\n  HostName 10.0.0.2\n\nHost baz\n  HostName 10.0.0.5\n  User admin\n"
        );
    }

    #[test]
    fn test_add_uses_context_defaults() {
        let fixture = Fixture::new("", "");
        let mut ctx = fixture.context(false);
        ctx.default_user = Some("deploy".to_string());
        ctx.default_identity_file = Some("/keys/deploy".to_string());

        add(&ctx, "10.0.0.5", &aliases(&["db"]), None, None, &mut Vec::new()).unwrap();

        assert_eq!(
            fixture.ssh_config(),
            "Host db\n  HostName 10.0.0.5\n  User deploy\n  IdentityFile /keys/deploy\n"
        );

        add(&ctx, "10.0.0.6", &aliases(&["cache"]), Some("ops"), None, &mut Vec::new()).unwrap();
        assert!(fixture.ssh_config().contains("Host cache\n  HostName 10.0.0.6\n  User ops\n"));
    }

    #[test]
    fn test_add_dry_run_prints_without_writing() {
        let fixture = Fixture::new("10.0.0.2 foo\n", "Host foo\n  HostName 10.0.0.2\n");
        let mut out = Vec::new();

        add(&fixture.context(true), "10.0.0.5", &aliases(&["baz"]), None, None, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let expected = format!(
            "{}:\n10.0.0.5 baz\n10.0.0.2 foo\n\n--\n{}:\nHost foo\n  HostName 10.0.0.2\n\nHost baz\n  HostName 10.0.0.5\n",
            fixture.hosts_file.display(),
            fixture.ssh_config.display()
        );
        assert_eq!(printed, expected);
        assert_eq!(fixture.hosts(), "10.0.0.2 foo\n");
        assert_eq!(fixture.ssh_config(), "Host foo\n  HostName 10.0.0.2\n");
    }

    #[test]
    fn test_remove_keeps_protected_entries() {
        let fixture = Fixture::new(
            "127.0.0.1 localhost\n10.0.0.5 db localhost\n10.0.0.2 foo\n",
            "Host localhost\n  HostName 127.0.0.1\n\nHost foo\n  HostName 10.0.0.2\n",
        );

        remove(&fixture.context(false), &aliases(&["localhost", "foo"]), &mut Vec::new()).unwrap();

        assert_eq!(fixture.hosts(), "127.0.0.1 localhost\n10.0.0.5 db localhost\n");
        assert_eq!(fixture.ssh_config(), "");
    }

    #[test]
    fn test_print_shows_sorted_hosts_and_config() {
        let fixture = Fixture::new("10.0.0.2 foo\n127.0.0.1 localhost\n", "Host foo\n  HostName 10.0.0.2\n");
        let mut out = Vec::new();

        print(&fixture.context(false), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with(&format!("{}:\n127.0.0.1 localhost\n10.0.0.2 foo\n", fixture.hosts_file.display())));
        assert!(printed.ends_with("Host foo\n  HostName 10.0.0.2\n"));
        // printing never touches the files
        assert_eq!(fixture.hosts(), "10.0.0.2 foo\n127.0.0.1 localhost\n");
    }

    #[test]
    fn test_list_numbers_alias_groups() {
        let fixture = Fixture::new(
            "127.0.0.1 localhost\n10.0.0.2 foo foo.lan\n",
            "Host foo\n  HostName 10.0.0.2\n\nMatch host bar\n  User git\n",
        );
        let mut out = Vec::new();

        list(&fixture.context(false), &mut out).unwrap();

        let expected = format!(
            "{}:\n0: localhost\n1: foo foo.lan\n\n--\n{}:\n0: foo\n1: host bar\n",
            fixture.hosts_file.display(),
            fixture.ssh_config.display()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let fixture = Fixture::new("", "");
        fs::remove_file(&fixture.ssh_config).unwrap();

        let result = add(&fixture.context(false), "10.0.0.5", &aliases(&["baz"]), None, None, &mut Vec::new());

        assert!(result.unwrap_err().to_string().contains("Failed to read"));
        // nothing is written when either file cannot be loaded
        assert_eq!(fixture.hosts(), "");
    }

    #[test]
    fn test_malformed_ssh_config_is_an_error() {
        let fixture = Fixture::new("", "User root\nHost foo\n");
        let result = print(&fixture.context(false), &mut Vec::new());
        assert!(result.unwrap_err().to_string().contains("before any Host or Match block"));
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_runs_editor_for_each_file() {
        let fixture = Fixture::new("10.0.0.2 foo\n", "");
        assert!(edit(&fixture.context(false), Some("true"), true).is_ok());
        assert!(edit(&fixture.context(false), Some("false"), false).is_err());
    }

    #[test]
    fn test_init_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addh").join("config.toml");

        let mut out = Vec::new();
        init_config(Some(&path), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Wrote default configuration"));
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());

        let mut out = Vec::new();
        init_config(Some(&path), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Configuration already exists"));
    }

    #[test]
    fn test_version_mentions_package() {
        let mut out = Vec::new();
        version(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with(&format!("addh version {}", env!("CARGO_PKG_VERSION"))));
    }
}
