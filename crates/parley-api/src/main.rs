//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, loads settings, then either starts the HTTP
//! server or dispatches to an admin command.

mod cli;
mod config;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use http::router::build_router;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let settings = config::load_settings(&config::settings_path(cli.config.clone()))?;

    match cli.command {
        Commands::Serve { host, port } => {
            let mut settings = settings;
            if let Some(host) = host {
                settings.api.host = host;
            }
            if let Some(port) = port {
                settings.api.port = port;
            }

            let addr = format!("{}:{}", settings.api.host, settings.api.port);
            let title = settings.api.title.clone();

            let state = AppState::init(settings).await?;
            let router = build_router(state);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!(%addr, %title, "serving");
            axum::serve(listener, router).await?;
        }

        Commands::CreateUser { email, superuser } => {
            cli::admin::create_user(&settings, &email, superuser).await?;
        }

        Commands::IssueToken { email } => {
            cli::admin::issue_token(&settings, &email).await?;
        }
    }

    Ok(())
}
