mod cli;

use std::{env, process};

use tracing_subscriber::EnvFilter;
use waypoint::{
    Catalog, SessionManager,
    config::{Config, StoreKind},
    storage::{FileStore, KeyValueStore, MemoryStore, SqliteStore},
};

fn main() {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        process::exit(1);
    });

    init_logging(&config);

    let catalog = match &config.catalog {
        Some(path) => Catalog::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load catalog {}: {e}", path.display());
            process::exit(1);
        }),
        None => Catalog::seeded(),
    };

    let store = open_store(&config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize storage: {e}");
        process::exit(1);
    });

    let mut manager = SessionManager::new(catalog, store);

    if let Err(e) = cli::run(&mut manager) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr, filtered by `WAYPOINT_LOG`, then `log-level`, then `warn`.
fn init_logging(config: &Config) {
    let filter = env::var("WAYPOINT_LOG")
        .ok()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &Config) -> Result<Box<dyn KeyValueStore>, String> {
    let data_dir = || config.data_dir().ok_or("could not determine home directory");
    let store: Box<dyn KeyValueStore> = match config.store {
        StoreKind::Sqlite => {
            let path = data_dir()?.join("waypoint.sqlite");
            Box::new(SqliteStore::open(path).map_err(|e| e.to_string())?)
        }
        StoreKind::Files => Box::new(FileStore::new(data_dir()?).map_err(|e| e.to_string())?),
        StoreKind::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}
