//! # HTTP API
//!
//! JSON endpoints over the lot service, plus the static web frontend.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/park     type=CAR&number=UP14AB1234  → ticket id + slot     │
//! │  POST /api/exit     vehicleNo=UP14AB1234        → amount + hours       │
//! │  GET  /api/status                               → totals per type      │
//! │  GET  /api/search?vehicleNo=UP14AB1234          → ticket + minutes     │
//! │  GET  /api/history                              → recent PAID tickets  │
//! │  GET  /api/parked                               → occupied slots       │
//! │  GET  /health                                   → database reachable?  │
//! │  GET  /*                                        → files under web_root │
//! │                                                                         │
//! │  Layers: CORS (any origin, GET/POST) → TraceLayer → handler            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cors;
pub mod dto;
pub mod form;
pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use parklot_db::ParkingLot;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub lot: ParkingLot,
    pub history_limit: i64,
}

/// Builds the full application router.
pub fn router(state: AppState, web_root: impl AsRef<Path>) -> Router {
    let api = Router::new()
        .route("/park", post(handlers::park))
        .route("/exit", post(handlers::exit))
        .route("/status", get(handlers::status))
        .route("/search", get(handlers::search))
        .route("/history", get(handlers::history))
        .route("/parked", get(handlers::parked));

    let static_files =
        ServeDir::new(web_root.as_ref()).not_found_service(handlers::not_found.into_service());

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .fallback_service(static_files)
        .layer(cors::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// =============================================================================
// Unit Tests
// =============================================================================
