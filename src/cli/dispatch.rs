use super::analyze::cmd_analyze;
use super::config::cmd_config;
use super::env::CliArgs;
use super::replay::cmd_replay;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Analyze(args) => cmd_analyze(args, ctx, cli.output).await,
        Commands::Replay(args) => cmd_replay(args, ctx, cli.output).await,
        Commands::Config(args) => cmd_config(args, ctx, cli.output).await,
    }
}
