//! Synchronize - the Synchronize 4.0 event site in a terminal
//!
//! Browses the event pages, plays the hero entrance and lets the visitor
//! equip a character from the picker.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use synchronize::branding::{APP_DISPLAY_NAME, LOG_FILE_NAME};
use synchronize::config::Config;
use synchronize::models::Catalog;
use synchronize::navigation::Location;
use synchronize::store::{
    FileStorage, MemoryStorage, SelectionStorage, SelectionStore, STORAGE_KEY,
};
use synchronize::tui;

/// Synchronize - the Synchronize 4.0 event site in a terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Page to open, e.g. `/`, `/team` or `/#events-section`
    #[arg(value_name = "LOCATION", default_value = "/")]
    location: Location,

    /// Load characters from a JSON catalog instead of the built-in roster
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Do not read or write the saved character
    #[arg(long)]
    no_persist: bool,

    /// Forget the saved character before starting
    #[arg(long)]
    reset_selection: bool,

    /// Print the character catalog and exit
    #[arg(long)]
    list_characters: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

/// Sends tracing output to a log file in the config directory, since the
/// terminal is owned by the UI.
fn init_logging(verbose: bool) -> Result<()> {
    let dir = Config::config_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.selection.catalog_path {
        Some(path) => Catalog::load(path),
        None => Ok(Catalog::builtin()),
    }
}

/// Picks where the selection lives. `--reset-selection` clears the saved
/// character even when this run does not persist.
fn open_storage(
    cli: &Cli,
    config: &Config,
    file_storage: impl FnOnce() -> Result<FileStorage>,
) -> Result<Box<dyn SelectionStorage>> {
    let persist = !cli.no_persist && config.selection.persist;
    if !persist && !cli.reset_selection {
        return Ok(Box::new(MemoryStorage::new()));
    }

    let mut storage = file_storage()?;
    if cli.reset_selection {
        storage.remove(STORAGE_KEY)?;
        tracing::info!(path = %storage.path().display(), "saved character cleared");
    }

    if persist {
        Ok(Box::new(storage))
    } else {
        Ok(Box::new(MemoryStorage::new()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Warning: logging disabled: {err:#}");
    }

    // Load or create default config
    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("Warning: using default configuration: {err:#}");
        Config::default()
    });
    if let Some(path) = &cli.catalog {
        config.selection.catalog_path = Some(path.clone());
    }
    config.validate()?;

    if cli.write_config {
        config.save()?;
        println!("Configuration written to {}", Config::config_file_path()?.display());
        return Ok(());
    }

    let catalog = load_catalog(&config)?;

    if cli.list_characters {
        println!("{} characters:", APP_DISPLAY_NAME);
        for option in &catalog {
            let marker = if option.id == catalog.default_id() { "*" } else { " " };
            println!("{marker} {:<16} {:<20} {}", option.id, option.name, option.color);
        }
        return Ok(());
    }

    let storage = open_storage(&cli, &config, FileStorage::default_location)?;
    let store = SelectionStore::with_storage(catalog, storage);
    tracing::info!(location = %cli.location, character = store.current(), "starting");

    let mut app_state = tui::AppState::new(store, config, cli.location);

    // Initialize TUI
    let mut terminal = tui::setup_terminal()?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal
    tui::restore_terminal(terminal)?;

    // Check for errors
    result
}
