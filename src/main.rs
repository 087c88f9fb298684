use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
mod github;
mod repository;
mod warden;

use github::Github;
use warden::manager::{Warden, WardenConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Setup tracing subscriber
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("branch_warden=info"))
                .unwrap(),
        )
        .compact()
        .init();

    let cli = cli::Cli::parse();

    let github = Github::new(&cli.token)?;
    let config = WardenConfig::new(cli.org, cli.interval, cli.error_policy, cli.max_retries);
    let warden = Warden::new(github, config);

    // run() only returns when a cycle has exhausted its retries
    if let Err(err) = warden.run().await {
        error!("Fatal: {err}");
        std::process::exit(1);
    }

    Ok(())
}
