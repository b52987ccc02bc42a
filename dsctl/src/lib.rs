//! # dsctl: Dataset Control Layer
//!
//! `dsctl` is an HTTP service for curating a dataset of short text samples in a low-resource
//! language. Clients submit text, the service scores its quality, infers a dialect and stores the
//! sample for later human validation. Metered endpoints are gated by issued API keys with
//! per-plan lifetime quotas, and every accepted call is written to a usage log.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer. State
//! lives behind two store traits, [`db::handlers::AccountStore`] and [`db::handlers::DatasetStore`],
//! with a PostgreSQL implementation for production and an in-memory implementation for local
//! development and tests.
//!
//! ### Request Flow
//!
//! ```text
//! request ─→ handler ─→ AccessController::authenticate_and_charge   (metered routes only)
//!                    ─→ scoring::score
//!                    ─→ DatasetStore                                (sentence routes)
//!                    ─→ JSON response
//! ```
//!
//! ### Core Components
//!
//! - [`scoring`]: pure, deterministic quality and dialect scoring
//! - [`auth`]: bearer key extraction and the [`auth::access::AccessController`], the only path
//!   that reads or charges quota
//! - [`db`]: store traits, their implementations and store errors
//! - [`api`]: route handlers and wire models
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use dsctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = dsctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     dsctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
mod crypto;
pub mod db;
pub mod errors;
mod openapi;
pub mod scoring;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test;

use crate::{
    auth::access::AccessController,
    db::handlers::{AccountStore, DatasetStore, InMemoryAccountStore, InMemoryDatasetStore, PgAccountStore, PgDatasetStore},
    openapi::ApiDoc,
};
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared state handed to every request handler.
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .access(AccessController::new(accounts))
///     .dataset(dataset)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub access: AccessController,
    pub dataset: Arc<dyn DatasetStore>,
}

/// Get the dsctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Build the storage backend named by the configuration.
///
/// Returns the pool as well for the postgres backend, so it can be closed on shutdown.
async fn setup_stores(config: &Config) -> anyhow::Result<(Arc<dyn AccountStore>, Arc<dyn DatasetStore>, Option<PgPool>)> {
    match &config.database {
        config::DatabaseConfig::Memory => {
            info!("Using in-memory storage; data will not survive a restart");
            Ok((Arc::new(InMemoryAccountStore::new()), Arc::new(InMemoryDatasetStore::new()), None))
        }
        config::DatabaseConfig::Postgres { url, pool: settings } => {
            info!("Using PostgreSQL storage");
            let pool = db::connect(url, settings).await?;
            migrator().run(&pool).await?;
            Ok((
                Arc::new(PgAccountStore::new(pool.clone())),
                Arc::new(PgDatasetStore::new(pool.clone())),
                Some(pool),
            ))
        }
    }
}

/// Build the application router with all routes and layers.
pub fn build_router(state: AppState) -> Router {
    let enable_metrics = state.config.enable_metrics;

    let mut router = Router::new()
        .route("/", get(api::handlers::service::root))
        .route("/signup", post(api::handlers::accounts::signup))
        .route("/account", get(api::handlers::accounts::get_account))
        .route("/analyze", post(api::handlers::analyze::analyze))
        .route(
            "/sentences",
            post(api::handlers::sentences::create_sentence).get(api::handlers::sentences::list_sentences),
        )
        .route(
            "/sentences/{sentence_id}",
            get(api::handlers::sentences::get_sentence).delete(api::handlers::sentences::delete_sentence),
        )
        .route("/sentences/{sentence_id}/validate", put(api::handlers::sentences::validate_sentence))
        .route("/stats", get(api::handlers::sentences::get_stats))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Add Prometheus metrics if enabled
    if enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    // Add tracing layer
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting dataset control layer with configuration: {:#?}", config);

        let (accounts, dataset, pool) = setup_stores(&config).await?;
        let state = AppState::builder()
            .config(config.clone())
            .access(AccessController::new(accounts))
            .dataset(dataset)
            .build();

        Ok(Self::from_state(state, pool))
    }

    /// Wrap prebuilt state, e.g. with stores constructed by the caller.
    pub fn from_state(state: AppState, pool: Option<PgPool>) -> Self {
        let config = state.config.clone();
        Self {
            router: build_router(state),
            config,
            pool,
        }
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Dataset control layer listening on http://{}, docs at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
