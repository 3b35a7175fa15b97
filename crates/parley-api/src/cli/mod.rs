//! CLI argument definitions and admin commands.

pub mod admin;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Parley: a chat backend with AI-generated replies.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the settings file (default: parley.toml, or $PARLEY_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind host (overrides the settings file)
        #[arg(long, env = "PARLEY_HOST")]
        host: Option<String>,

        /// Bind port (overrides the settings file)
        #[arg(long, env = "PARLEY_PORT")]
        port: Option<u16>,
    },

    /// Create a user (prompts for a password)
    CreateUser {
        /// Email address of the new user
        email: String,

        /// Grant superuser privileges
        #[arg(long)]
        superuser: bool,
    },

    /// Issue an access token for an existing user (printed once)
    IssueToken {
        /// Email address of the user
        email: String,
    },
}
