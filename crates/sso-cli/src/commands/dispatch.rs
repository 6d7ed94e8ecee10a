use sso_config::SsoConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &SsoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Resolve(args) => commands::resolve::handle(&args, config, flags).await,
        Commands::CheckConfig => commands::check_config::handle(config, flags),
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
