//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Claim checker CLI
#[derive(Parser, Debug)]
#[command(name = "claimctl")]
#[command(about = "Claim Check - submit claims to a fact-check service", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Base URL of the analysis service (overrides $CLAIMCHECK_API_URL and config)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand (if not provided, starts an interactive session)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one claim and print the verdict
    Check(CheckArgs),

    /// Interactive session with drafts for each input mode
    Session,

    /// Show the effective configuration
    Config,
}

#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Claim text. With --url or --file it is sent as context.
    pub claim: Option<String>,

    /// Check the page at this URL
    #[arg(long, conflicts_with = "files")]
    pub url: Option<String>,

    /// Check an image or PDF (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Draft rebuttal replies when the claim is false or misleading
    #[arg(long)]
    pub replies: bool,

    /// Language for drafted replies (defaults to config)
    #[arg(long, requires = "replies")]
    pub language: Option<String>,

    /// Print the normalized result as JSON
    #[arg(long)]
    pub json: bool,
}
