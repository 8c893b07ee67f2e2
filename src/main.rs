mod auth;
mod currency;
mod db;
mod export;
mod ledger;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    init_tracing(db_path.parent().unwrap_or_else(|| Path::new(".")))?;
    let db = db::Database::open(&db_path)?;

    match args.len() {
        1 => {
            if !auth::is_authenticated(&db)? {
                eprintln!("Not logged in. Run: budgetcards login <email> <password>");
                return Ok(());
            }
            run::as_tui(&db)
        }
        2.. => run::as_cli(&args, &db),
        _ => {
            eprintln!("Usage: budgetcards [command]");
            Ok(())
        }
    }
}

/// Log to `budgetcards.log` next to the database; the terminal belongs to the TUI.
fn init_tracing(dir: &Path) -> Result<()> {
    let log_path = dir.join("budgetcards.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("BUDGETCARDS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

fn get_db_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BUDGETCARDS_DB") {
        let path = PathBuf::from(run::shellexpand(&path));
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        return Ok(path);
    }
    let proj_dirs = directories::ProjectDirs::from("com", "budgetcards", "BudgetCards")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("budgetcards.db"))
}
