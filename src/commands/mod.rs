pub mod connection;
pub mod meta;
pub mod sql;

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use crate::betterbase::client::MetaClient;
use crate::betterbase::config::ClientSettings;
use crate::betterbase::store::{ConnectionStore, FileStorage};
use crate::CONNECTIONS_FILE;

/// Everything a command needs to reach the store and build clients.
pub struct Context {
    pub connections_file: PathBuf,
    pub settings: ClientSettings,
}

impl Context {
    pub fn new(connections_file: Option<PathBuf>, settings_file: Option<PathBuf>) -> Result<Self> {
        let connections_file =
            connections_file.unwrap_or_else(|| CONNECTIONS_FILE.as_path().to_path_buf());
        info!("Using connections file: {}", connections_file.display());
        Ok(Self {
            connections_file,
            settings: ClientSettings::from_file(settings_file.as_ref())?,
        })
    }

    pub fn open_store(&self) -> Result<ConnectionStore<FileStorage>> {
        ConnectionStore::load(FileStorage::new(&self.connections_file))
    }

    /// Client for the active connection of `store`.
    pub fn active_client(&self, store: &ConnectionStore<FileStorage>) -> Result<MetaClient> {
        let connection = store.get_active().ok_or_else(|| {
            anyhow::anyhow!("No active connection. Add one with `bbdash connection add`.")
        })?;
        info!("Using connection {} ({})", connection.name, connection.url);
        MetaClient::new(connection, &self.settings)
    }
}

/// Resolves a connection by id, falling back to the first one with that name.
pub fn resolve_connection(store: &ConnectionStore<FileStorage>, id_or_name: &str) -> Option<String> {
    store
        .get(id_or_name)
        .or_else(|| store.connections().iter().find(|c| c.name == id_or_name))
        .map(|c| c.id.clone())
}

pub fn setup_logging(log_level: &str) -> Result<()> {
    // Get the XDG state directory for logs
    let log_dir = crate::get_state_dir().join("logs");

    // Create the log directory if it doesn't exist
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join(format!(
        "bbdash-debug-{}.log",
        chrono::Local::now().format("%Y%m%d%H%M%S")
    ));

    let log_level = match log_level.to_lowercase().as_str() {
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    WriteLogger::init(log_level, Config::default(), File::create(&log_file_path)?)?;

    // Log the file location so users know where to find it
    info!("Logging to: {}", log_file_path.display());

    Ok(())
}
