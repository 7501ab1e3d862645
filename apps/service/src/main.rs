use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use upwatch::Config;
use upwatch::monitoring::Orchestrator;
use upwatch::pool::LibsqlManager;

/// Website uptime monitoring daemon.
#[derive(Debug, Parser)]
#[command(name = "upwatch-service", version, about)]
struct Args {
    /// Path to the TOML configuration file (defaults to
    /// $XDG_CONFIG_HOME/upwatch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let args = Args::parse();
    let config = Config::from_config(args.config.as_ref())?;

    tracing::info!(database = %config.database.path, "Starting upwatch service");

    let database = libsql::Builder::new_local(&config.database.path).build().await?;
    let manager = LibsqlManager::new(database);
    let pool = deadpool::managed::Pool::builder(manager).build()?;

    Orchestrator::start(&config, pool).await?;
    Ok(())
}
