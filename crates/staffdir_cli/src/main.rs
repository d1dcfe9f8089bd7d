//! Terminal front end for the staff directory.
//!
//! # Responsibility
//! - Resolve configuration from flags and `STAFFDIR_*` variables.
//! - Bootstrap logging, SQLite storage and the employee store.
//! - Hand stdin/stdout to the interactive shell.

mod card;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use staffdir_core::db::open_db;
use staffdir_core::{init_logging, AppConfig, EmployeeStore, SqliteKeyValueStore};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "staffdir", version, about = "Browse and edit the employee directory")]
struct Args {
    /// SQLite file holding the directory.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Start empty instead of installing the sample employees.
    #[arg(long)]
    no_seed: bool,

    /// Search debounce window in milliseconds.
    #[arg(long)]
    debounce_ms: Option<u64>,
}

impl Args {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(path) = self.db_path {
            config.db_path = path;
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = dir;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.no_seed {
            config.seed_sample_data = false;
        }
        if let Some(millis) = self.debounce_ms {
            config.search_debounce = Duration::from_millis(millis);
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.apply(AppConfig::from_env().context("invalid STAFFDIR_* environment")?);

    if let Err(err) = init_logging(&config) {
        eprintln!("logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let storage = SqliteKeyValueStore::try_new(&conn).context("storage not ready")?;
    let store = EmployeeStore::initialize(storage, config.seed_sample_data);
    if store.is_empty() && config.seed_sample_data {
        warn!("event=cli_start module=cli status=ok note=empty_after_seed");
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = shell::Shell::new(&store, config.search_debounce, stdin.lock(), stdout.lock());
    shell.run()
}
