// ABOUTME: Entry point for the addh command-line tool
// ABOUTME: Resolves settings into a Context and dispatches to the command operations

use addh::cli::{CommandLine, Commands};
use addh::commands;
use addh::config::{Config, Context};
use addh::logging;
use anyhow::Result;

fn main() -> Result<()> {
    let cli = CommandLine::parse_args();
    logging::init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Version => return commands::version(&mut stdout),
        Commands::InitConfig => return commands::init_config(cli.config.as_deref(), &mut stdout),
        _ => {}
    }

    let config = Config::load(cli.config.as_deref())?;
    let ctx = Context::resolve(config, cli.overrides())?;
    tracing::debug!("Resolved context: {:?}", ctx);

    match cli.command {
        Commands::Add {
            address,
            aliases,
            user,
            identity_file,
        } => commands::add(
            &ctx,
            &address,
            &aliases,
            user.as_deref(),
            identity_file.as_deref(),
            &mut stdout,
        ),
        Commands::Rm { names } => commands::remove(&ctx, &names, &mut stdout),
        Commands::Print => commands::print(&ctx, &mut stdout),
        Commands::List => commands::list(&ctx, &mut stdout),
        Commands::Edit { editor, etc_hosts } => commands::edit(&ctx, editor.as_deref(), etc_hosts),
        Commands::Version | Commands::InitConfig => Ok(()),
    }
}
