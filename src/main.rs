use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Parser, Subcommand};

mod betterbase;
mod commands;
mod playground;

use anyhow::Result;
use betterbase::store::STORAGE_NAMESPACE;
use commands::connection::model::ConnectionCommand;
use commands::meta::model::MetaCommand;
use commands::sql::SqlCommand;
use commands::Context;
use dirs::{config_dir, home_dir, state_dir};

/// Configuration directory following the XDG Base Directory specification
/// (~/.config/bbdash)
static CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    config_dir()
        .unwrap_or_else(|| {
            home_dir()
                .expect("HOME directory must be set to run bbdash")
                .join(".config")
        })
        .join("bbdash")
});

/// Saved connections, named after the storage namespace
pub static CONNECTIONS_FILE: LazyLock<PathBuf> =
    LazyLock::new(|| CONFIG_DIR.join(format!("{STORAGE_NAMESPACE}.toml")));

/// HTTP client settings (timeout, proxy)
pub static SETTINGS_FILE: LazyLock<PathBuf> = LazyLock::new(|| CONFIG_DIR.join("settings.toml"));

/// Get the state directory path using XDG Base Directory specification
/// Used for logs
pub fn get_state_dir() -> PathBuf {
    state_dir()
        .unwrap_or_else(|| {
            home_dir()
                .expect("HOME directory must be set to run bbdash")
                .join(".local")
                .join("state")
        })
        .join("bbdash")
}

#[derive(Parser)]
#[clap(name = "bbdash", bin_name = "bbdash", version, about)]
struct BbdashApp {
    /// Connections file to use instead of the default one
    #[clap(short, long, global = true)]
    file: Option<String>,
    /// Settings file to use instead of the default one
    #[clap(long, global = true)]
    settings: Option<String>,
    #[clap(subcommand)]
    command: BbdashCommand,
}

#[derive(Subcommand)]
enum BbdashCommand {
    /// Manage saved connections
    #[clap(subcommand)]
    Connection(ConnectionCommand),
    #[clap(flatten)]
    Meta(MetaCommand),
    /// Translate a Drizzle query-builder expression into SQL
    Sql(SqlCommand),
}

impl BbdashApp {
    pub async fn run(&self) -> Result<()> {
        let context = Context::new(
            self.file.as_ref().map(PathBuf::from),
            self.settings.as_ref().map(PathBuf::from),
        )?;
        match &self.command {
            BbdashCommand::Connection(cmd) => cmd.run(&context).await,
            BbdashCommand::Meta(cmd) => cmd.run(&context).await,
            BbdashCommand::Sql(cmd) => cmd.run(),
        }
    }
}

// Install the ring crypto provider for rustls once, before any request
fn init_crypto_provider() {
    use std::sync::Once;
    static CRYPTO_PROVIDER_INIT: Once = Once::new();

    CRYPTO_PROVIDER_INIT.call_once(|| {
        // This may fail if a provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Line printed to stderr when a command fails
fn failure_line(error: &anyhow::Error) -> String {
    format!("❌ {error:#}")
}

async fn start() -> Result<()> {
    if let Ok(log_level) = std::env::var("BBDASH_LOG") {
        commands::setup_logging(&log_level)?;
    }

    let app = BbdashApp::parse();
    app.run().await
}

#[tokio::main]
async fn main() {
    init_crypto_provider();

    if let Err(error) = start().await {
        log::error!("{error:#}");
        eprintln!("{}", failure_line(&error));
        std::process::exit(1);
    }
}
