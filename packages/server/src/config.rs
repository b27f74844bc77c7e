//! Server configuration resolved from environment variables.
//!
//! Every setting has a default that matches the layout of a production
//! checkout (frontend build under `build/`, data files in the working
//! directory). Command-line flags in the binary override these values.

use std::path::PathBuf;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port.
pub const DEFAULT_PORT: u16 = 8007;
/// Origin allowed to make cross-origin requests by default.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
/// Default upload size limit (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// The single origin allowed by CORS (`CORS_ORIGIN`).
    pub cors_origin: String,
    /// Frontend build directory holding `index.html` and `static/`
    /// (`FRONTEND_DIR`).
    pub frontend_dir: PathBuf,
    /// JSON state catalog (`STATE_MAPPING_PATH`).
    pub state_mapping_path: PathBuf,
    /// Pre-trained classifier artifact (`CLASSIFIER_PATH`).
    pub classifier_path: PathBuf,
    /// Where the latest upload is persisted (`SNAPSHOT_PATH`).
    pub snapshot_path: PathBuf,
    /// Maximum accepted multipart payload size (`MAX_UPLOAD_BYTES`).
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            frontend_dir: PathBuf::from("build"),
            state_mapping_path: PathBuf::from("state_mapping.json"),
            classifier_path: PathBuf::from("rf_model.pkl"),
            snapshot_path: PathBuf::from("uploaded_crime_dataset.csv"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Builds a config from the process environment, falling back to
    /// [`ServerConfig::default`] for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            frontend_dir: lookup("FRONTEND_DIR").map_or(defaults.frontend_dir, PathBuf::from),
            state_mapping_path: lookup("STATE_MAPPING_PATH")
                .map_or(defaults.state_mapping_path, PathBuf::from),
            classifier_path: lookup("CLASSIFIER_PATH")
                .map_or(defaults.classifier_path, PathBuf::from),
            snapshot_path: lookup("SNAPSHOT_PATH").map_or(defaults.snapshot_path, PathBuf::from),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    /// The frontend entry document.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.frontend_dir.join("index.html")
    }

    /// Directory served under `/static`.
    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.frontend_dir.join("static")
    }
}
