//! dirll server binary.
//!
//! Configuration precedence: CLI flags, then environment (`PORT`,
//! `SCAN_PATH`, `BASIC_AUTH`, `ONLY_EXT`, ...), then the optional TOML file,
//! then built-in defaults.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use dirll::config::{self, ConfigError, ServerConfig};
use dirll::lifecycle::{self, signals, Shutdown};
use dirll::observability::logging;
use dirll::routing::RoutingMode;

#[derive(Parser)]
#[command(name = "dirll")]
#[command(about = "Serve a directory tree as a browsable list of files", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TCP port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to enumerate and serve
    #[arg(long)]
    scan_path: Option<PathBuf>,

    /// Routing mode: `path` or `extension`
    #[arg(long)]
    routing: Option<RoutingMode>,
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(path) = &self.scan_path {
            config.scan.root = path.clone();
        }
        if let Some(mode) = self.routing {
            config.routing.mode = mode;
        }
    }
}

fn load(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::read_config_file(path)?,
        None => ServerConfig::default(),
    };
    config::apply_env(&mut config, std::env::vars())?;
    cli.apply(&mut config);
    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("dirll v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address(),
        scan_root = ?config.scan.root,
        routing = %config.routing.mode,
        only_ext = ?config.scan.only_ext,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(Arc::clone(&shutdown));

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
