//! Spotter CLI - Command-line interface for the aircraft sighting log.

use clap::Parser;
use spotter_cli::commands;
use spotter_cli::{Cli, Command, Config, Formatter};
use spotter_engine::{FilterPreferences, QueryEngine};
use spotter_store::SqliteStore;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("SPOTTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> spotter_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(database) = cli.database {
        config.database = Some(database);
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut store = SqliteStore::new(&db_path)?;

    match cli.command {
        Command::Add(args) => commands::execute_add(args, &mut store, &formatter)?,
        cmd => {
            let engine = QueryEngine::new(config.engine.clone());
            let mut prefs = FilterPreferences::new(store, &config.engine);

            match cmd {
                Command::List(args) => commands::execute_list(args, &prefs, &engine, &formatter)?,
                Command::Facets(args) => {
                    commands::execute_facets(args, &prefs, &engine, &formatter)?
                }
                Command::Filter(args) => commands::execute_filter(args, &mut prefs, &formatter)?,
                Command::Add(_) => unreachable!(),
            }
        }
    }

    Ok(())
}
