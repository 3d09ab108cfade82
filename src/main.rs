use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use dailytrack::cli::args::{Cli, Commands};
use dailytrack::cli::handlers;
use dailytrack::config::AppConfig;
use dailytrack::db::{SqliteBackend, StoreConnection};
use dailytrack::{TrackerError, ValidationError};

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        match validation_problem(&err) {
            Some(v) => handlers::print_validation_warning(v),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    let store_path = config.store_path(cli.store.as_deref())?;
    AppConfig::ensure_parent_dir(&store_path)?;
    let backend = SqliteBackend::open(&store_path)
        .with_context(|| format!("Opening store at {:?}", store_path))?;
    debug!("Using store {:?}", store_path);

    // One connection for the whole invocation, lent to every repository.
    let conn = StoreConnection::new(
        backend,
        config.store.collection.clone(),
        config.store.grants.clone(),
    );

    match &cli.command {
        Commands::Log(args) => handlers::handle_log(&conn, args)?,
        Commands::Entries { recent, all } => {
            handlers::handle_entries(&conn, &config, *recent, *all)?
        }
        Commands::DeleteEntry { id } => handlers::handle_delete_entry(&conn, *id)?,
        Commands::Todo { action } => handlers::handle_todo(&conn, action)?,
        Commands::Insights => handlers::handle_insights(&conn)?,
        Commands::Info => handlers::handle_info(&conn, &store_path)?,
    }

    Ok(())
}

fn validation_problem(err: &anyhow::Error) -> Option<&ValidationError> {
    if let Some(v) = err.downcast_ref::<ValidationError>() {
        return Some(v);
    }
    match err.downcast_ref::<TrackerError>() {
        Some(TrackerError::Validation(v)) => Some(v),
        _ => None,
    }
}
