pub mod cameras;
pub mod capture;
pub mod commands;
pub mod config;
pub mod db;
pub mod readings;
pub mod report;
pub mod shutter;
pub mod state;
pub mod storage;
pub mod util;

use anyhow::Context;
use state::AppState;
use std::path::Path;
use storage::{file::FileStorage, sqlite::SqliteStorage, StorageMedium};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over `default_filter`; a
/// second call is a no-op.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Read `<home>/config.json`, install logging with its filter, open the
/// configured medium and load the container.
pub fn open_app_state(home: &Path) -> anyhow::Result<AppState> {
    std::fs::create_dir_all(home)
        .with_context(|| format!("Failed to create {}", home.display()))?;
    let config = config::read_config(home)?;
    init_logging(&config.log_filter);
    let storage: Box<dyn StorageMedium + Send> = match config.storage {
        config::StorageBackend::File => Box::new(FileStorage::new(home.join("data"))),
        config::StorageBackend::Sqlite => {
            Box::new(SqliteStorage::open(&home.join("shutterlog.db"))?)
        }
    };
    tracing::info!("open_app_state: home={} storage={:?}", home.display(), config.storage);
    Ok(AppState::open(storage, config.export_dir(home)))
}
