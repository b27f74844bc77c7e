#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime insights application.
//!
//! Serves the single-page frontend, accepts uploaded crime datasets for
//! preview (`/upload-dataset`), aggregates crime types per state and year
//! (`/crime-analysis`), and lists the static state catalog (`/states`).
//! The state catalog and the classifier artifact are loaded once at startup
//! into an immutable [`AppState`].

pub mod classifier;
pub mod config;
mod error;
mod handlers;
pub mod interactive;

use actix_cors::Cors;
use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{App, HttpServer, middleware, web};
use crime_insights_states::{StateCatalog, StateCatalogError};

pub use config::ServerConfig;
pub use error::ApiError;

use crate::classifier::ClassifierArtifact;

/// Shared application state. Read-only after startup.
pub struct AppState {
    /// Resolved configuration.
    pub config: ServerConfig,
    /// State catalog, or the error that prevented loading it.
    pub states: Result<StateCatalog, StateCatalogError>,
    /// Classifier artifact, if it could be read.
    pub classifier: Option<ClassifierArtifact>,
}

impl AppState {
    /// Loads the state catalog and classifier artifact named by `config`.
    ///
    /// Neither failure is fatal: a missing catalog is reported by `/states`
    /// on every call, and a missing artifact only shows up in `/health`.
    #[must_use]
    pub fn load(config: ServerConfig) -> Self {
        let states = StateCatalog::load(&config.state_mapping_path);
        if let Err(e) = &states {
            log::warn!("State catalog unavailable: {e}");
        }

        let classifier = match ClassifierArtifact::load(&config.classifier_path) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                log::warn!(
                    "Classifier artifact {} unavailable: {e}",
                    config.classifier_path.display()
                );
                None
            }
        };

        Self {
            config,
            states,
            classifier,
        }
    }
}

/// Registers the API routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/states", web::get().to(handlers::states))
        .route("/upload-dataset", web::post().to(handlers::upload_dataset))
        .route("/crime-analysis", web::post().to(handlers::crime_analysis))
        .route("/", web::get().to(handlers::index));
}

/// Multipart limits and JSON error reporting for upload forms.
#[must_use]
pub fn multipart_config(config: &ServerConfig) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(config.max_upload_bytes)
        .memory_limit(config.max_upload_bytes)
        .error_handler(ApiError::from_multipart)
}

/// CORS policy allowing only the configured origin.
#[must_use]
pub fn cors(config: &ServerConfig) -> Cors {
    Cors::default()
        .allowed_origin(&config.cors_origin)
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Starts the crime insights API server.
///
/// Loads the state catalog and classifier artifact, then serves the API,
/// the frontend entry document, and static assets under `/static`. This is
/// a regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    let state = web::Data::new(AppState::load(config));

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let config = &state.config;

        App::new()
            .wrap(cors(config))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(multipart_config(config))
            .configure(routes)
            // Serve frontend build assets
            .service(Files::new("/static", config.static_dir()))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
