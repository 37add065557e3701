use clap::Subcommand;

use super::analyze::AnalyzeArgs;
use super::config::ConfigArgs;
use super::replay::ReplayArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Rank each step's locators and report repeated step runs
    Analyze(AnalyzeArgs),

    /// Replay a scenario against a page snapshot
    Replay(ReplayArgs),

    /// Manage locator-replay configuration
    Config(ConfigArgs),
}
