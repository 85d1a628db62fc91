mod cli;
mod config;
mod error;
mod git;
mod gitlab;
mod output;
mod server;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting gitlab-ci-mcp");
    cli.execute().await?;

    Ok(())
}
