//! Fraterno Storefront library.
//!
//! The snack-bar side of the Fraterno Amor site: renders the menu page the
//! cart widget runs on, receives checkout submissions and keeps the order
//! board. The crate is a library so the router can be tested in-process and
//! driven by the integration tests; `main.rs` only wires up telemetry and
//! the listener.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for the snack-bar page
//! - Catalog and orders kept in memory behind `tokio::sync::RwLock`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod state;

use axum::{Router, http::Uri, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use catalog::{Catalog, CatalogError};
use config::StorefrontConfig;
use error::AppError;
use state::AppState;

/// Load the configured catalog, or the built-in menu when none is set.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed.
pub async fn load_catalog(config: &StorefrontConfig) -> Result<Catalog, CatalogError> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = Catalog::load(path).await?;
            tracing::info!(
                path = %path.display(),
                products = catalog.products().len(),
                "catalog loaded"
            );
            Ok(catalog)
        }
        None => {
            tracing::info!("no catalog configured, serving the built-in menu");
            Ok(Catalog::builtin())
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Answer unknown paths with a plain 404.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
