use self::command::Command;
use clap::Parser;
use color_eyre::eyre::{self, Context};
use corvid_config::Configuration;
use std::path::PathBuf;

mod command;

/// Manage and inspect the Corvid relationship graph
#[derive(Parser)]
#[command(about, author, version)]
struct Args {
    /// Path to the configuration file
    #[clap(long, short)]
    config: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = Configuration::load(args.config).await?;
    corvid_observability::initialise()?;

    let db_pool = corvid_db::connect(&config.database)
        .await
        .map_err(corvid_error::Error::into_error)
        .wrap_err("Failed to connect to and migrate the database")?;

    command::handle(args.command, &config, db_pool).await
}
