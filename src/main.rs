use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{ConfigCommand, IngredientCommand, RecipeCommand};
use config::Config;
use recipebox::{Catalog, FileStore};

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(version)]
#[command(about = "Keep your recipes and ingredients on this device", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage recipes
    Recipe(RecipeCommand),

    /// Browse and manage ingredients
    Ingredient(IngredientCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Recipe(cmd)) => {
            let catalog = open_catalog(&config);
            cmd.run(&catalog.recipes).await?;
        }
        Some(Commands::Ingredient(cmd)) => {
            let catalog = open_catalog(&config);
            cmd.run(&catalog.ingredients).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn open_catalog(config: &Config) -> Catalog<FileStore> {
    let store = FileStore::new(config.data_dir.value.clone());
    let catalog = Catalog::new(store, config.catalog_keys());
    tracing::debug!(
        data_dir = %config.data_dir.value.display(),
        recipes_key = catalog.recipes.key(),
        ingredients_key = catalog.ingredients.key(),
        "opening catalog"
    );

    if config.seed_examples.value {
        catalog.with_examples()
    } else {
        catalog
    }
}
