#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime insights API server.

use std::path::PathBuf;

use clap::Parser;
use crime_insights_server::ServerConfig;

#[derive(Parser)]
#[command(name = "crime_insights_server", about = "Crime insights API server")]
struct Cli {
    /// Prompt for bind address and port before starting
    #[arg(long)]
    interactive: bool,
    /// Address to bind to (overrides `BIND_ADDR`)
    #[arg(long)]
    bind: Option<String>,
    /// Port to listen on (overrides `PORT`)
    #[arg(long)]
    port: Option<u16>,
    /// Origin allowed to make cross-origin requests (overrides `CORS_ORIGIN`)
    #[arg(long)]
    cors_origin: Option<String>,
    /// Frontend build directory (overrides `FRONTEND_DIR`)
    #[arg(long)]
    frontend_dir: Option<PathBuf>,
    /// State catalog JSON file (overrides `STATE_MAPPING_PATH`)
    #[arg(long)]
    state_mapping: Option<PathBuf>,
    /// Classifier artifact file (overrides `CLASSIFIER_PATH`)
    #[arg(long)]
    classifier: Option<PathBuf>,
    /// Where uploaded datasets are persisted (overrides `SNAPSHOT_PATH`)
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Maximum upload size in bytes (overrides `MAX_UPLOAD_BYTES`)
    #[arg(long)]
    max_upload_bytes: Option<usize>,
}

impl Cli {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(origin) = self.cors_origin {
            config.cors_origin = origin;
        }
        if let Some(dir) = self.frontend_dir {
            config.frontend_dir = dir;
        }
        if let Some(path) = self.state_mapping {
            config.state_mapping_path = path;
        }
        if let Some(path) = self.classifier {
            config.classifier_path = path;
        }
        if let Some(path) = self.snapshot {
            config.snapshot_path = path;
        }
        if let Some(limit) = self.max_upload_bytes {
            config.max_upload_bytes = limit;
        }
        config
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let interactive = cli.interactive;
    let config = cli.apply(ServerConfig::from_env());

    if interactive {
        return crime_insights_server::interactive::run(config).await;
    }

    crime_insights_server::run_server(config).await
}
