use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod db;
mod error;
mod formats;
mod grocery;
mod models;
mod selection;

use commands::{
    AddCommand, ConfigCommand, DeleteCommand, ExportCommand, GroceryCommand, ImportCommand,
    InitCommand, ListCommand, RandomCommand, SnapshotCommand,
};
use config::Config;
use db::open_store;

#[derive(Parser)]
#[command(name = "recipe-drawer")]
#[command(version)]
#[command(about = "A personal recipe drawer: random picks, grocery lists, import and export", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Path to the recipe store (overrides config and environment)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store and load the sample recipes
    Init(InitCommand),

    /// List recipes
    List(ListCommand),

    /// Add a recipe
    Add(AddCommand),

    /// Delete a recipe
    Delete(DeleteCommand),

    /// Pick random recipes
    Random(RandomCommand),

    /// Build a grocery list
    Grocery(GroceryCommand),

    /// Import recipes from a file
    Import(ImportCommand),

    /// Export all recipes to a file
    Export(ExportCommand),

    /// Write a publishing snapshot
    Snapshot(SnapshotCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_drawer=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?.with_store_path(cli.db);

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let store = open_store(&config.store_path.value, config.backend.value).await?;
    let store = &*store;

    match command {
        Commands::Init(cmd) => cmd.run(store).await?,
        Commands::List(cmd) => cmd.run(store).await?,
        Commands::Add(cmd) => cmd.run(store).await?,
        Commands::Delete(cmd) => cmd.run(store).await?,
        Commands::Random(cmd) => cmd.run(store).await?,
        Commands::Grocery(cmd) => cmd.run(store, &config).await?,
        Commands::Import(cmd) => cmd.run(store).await?,
        Commands::Export(cmd) => cmd.run(store).await?,
        Commands::Snapshot(cmd) => cmd.run(store).await?,
        Commands::Config(cmd) => cmd.run(&config)?,
    }

    Ok(())
}
