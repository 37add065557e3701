use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use super::commands::Commands;
use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, load_local_env_overrides, LoadedConfig};

pub async fn run() -> Result<()> {
    load_local_env_overrides();
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;
    debug!("Starting locator-replay v{}", env!("CARGO_PKG_VERSION"));

    let validate = !matches!(cli.command, Commands::Config(_));
    let LoadedConfig { config, path } = load_config(cli.config.as_ref(), validate).await?;
    let cli_context = CliContext::new(config, path);

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            debug!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
