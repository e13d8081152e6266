//! # TaskNest CLI
//!
//! Signs in by email and manages your tasks from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! tasknest login you@example.com
//! tasknest add "Write report" --description "Q3 numbers"
//! tasknest list
//! ```

use clap::Parser;
use std::process::ExitCode;
use tasknest_client::cli::{self, Cli};
use tasknest_client::config::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing (stdout is reserved for command output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknest_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    tracing::debug!(
        api = %config.api.base_url,
        "TaskNest CLI v{} starting",
        tasknest_client::VERSION
    );

    cli::run(cli, config).await
}
