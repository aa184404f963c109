//! HTTP API server for the train seat reservation engine.
//!
//! Exposes booking, seat change, cancellation and listing over REST,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;

pub mod routes {
    pub mod health;
    pub mod metrics;
    pub mod tickets;
}

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use metrics_exporter_prometheus::PrometheusHandle;
use reservation::{InventoryConfig, ReservationEngine};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::tickets::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/tickets",
            get(routes::tickets::list).post(routes::tickets::reserve),
        )
        .route(
            "/tickets/{id}",
            get(routes::tickets::get).delete(routes::tickets::cancel),
        )
        .route("/tickets/{id}/seats", put(routes::tickets::modify))
        .route("/seats", get(routes::tickets::seat_map))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state around a fresh engine for the given inventory.
pub fn create_default_state(inventory: &InventoryConfig) -> Arc<AppState> {
    Arc::new(AppState {
        engine: ReservationEngine::with_config(inventory),
    })
}
