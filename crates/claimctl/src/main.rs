//! claimctl - submit claims to a fact-check service and read the verdict
//!
//! With no subcommand an interactive session starts.

use anyhow::{Context, Result};
use clap::Parser;
use claimcheck_common::ClaimCheckConfig;
use claimctl::cli::{Cli, Commands};
use claimctl::{commands, logging, repl};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let (mut config, source) = ClaimCheckConfig::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.as_deref() {
        config
            .override_api_url(url)
            .context("Invalid --api-url")?;
    }
    debug!(source = %source, api = %config.api.base_url, "configuration loaded");

    let code = match cli.command {
        None | Some(Commands::Session) => repl::run(&config).await?,
        Some(Commands::Check(args)) => commands::check(&config, &args).await?,
        Some(Commands::Config) => commands::show_config(&config, &source)?,
    };

    std::process::exit(code);
}
