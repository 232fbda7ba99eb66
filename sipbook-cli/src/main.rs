//! sipbook - command-line drink composition notebook
//!
//! Browse presets, look up original recipes, customize and save drink
//! compositions, and export them as shareable text.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sipbook_common::config::{self, RootFolderInitializer, RootFolderResolver};
use sipbook_common::lookup::{LocalRecipeSource, RemoteRecipeSource};
use sipbook_common::{RecipeLookupService, SqliteCompositionStore};

mod commands;

use commands::{App, Command};

/// Command-line arguments for sipbook
#[derive(Parser, Debug)]
#[command(name = "sipbook")]
#[command(about = "Customize, save and share cocktail and mocktail recipes")]
#[command(version)]
struct Args {
    /// Folder holding the sipbook database
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// Config file (default: <config dir>/sipbook/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API Ninjas key for cocktail lookups
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. "debug")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);
    let level = args
        .log_level
        .clone()
        .or_else(|| {
            config_path
                .as_deref()
                .and_then(|p| config::read_toml_config(p).ok())
                .map(|c| c.logging.level)
        })
        .unwrap_or_else(|| "info".to_string());

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting sipbook v{}", env!("CARGO_PKG_VERSION"));

    let toml_config = config::load_toml_config(config_path.as_deref());

    let root_folder = RootFolderResolver::new(args.root_folder.clone(), &toml_config).resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let store = SqliteCompositionStore::open(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let api_key = config::resolve_api_key(args.api_key.as_deref(), &toml_config);
    let remote = RemoteRecipeSource::with_base_url(api_key, toml_config.api_base_url())
        .context("Failed to build HTTP client")?;
    let local = LocalRecipeSource::new(toml_config.dataset_resource());
    let lookup = RecipeLookupService::new(Arc::new(remote), Arc::new(local));

    let mut app = App::new(Arc::new(store), lookup);
    let output = app.run(args.command).await?;
    print!("{output}");

    Ok(())
}
