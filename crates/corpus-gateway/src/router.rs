//! Route table (spec §6). Auth, concurrency, and rate-limit middleware are
//! layered onto exactly the routes the spec names and no others.

use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::auth as auth_mw;
use crate::middleware::{concurrency, rate};
use crate::state::AppState;

/// Per-connection read timeout (spec §5 "Timeouts").
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build(state: AppState) -> Router {
    let search_route = Router::new()
        .route("/api/search", get(handlers::search))
        .layer(from_fn_with_state(state.clone(), concurrency::enforce));

    let isearch_route = Router::new()
        .route("/api/isearch", get(handlers::isearch))
        .layer(from_fn_with_state(state.clone(), rate::enforce));

    let privileged = Router::new()
        .route("/api/db/update", post(handlers::db_update))
        .route("/api/db", delete(handlers::db_drop))
        .layer(from_fn_with_state(state.clone(), auth_mw::enforce));

    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/ping", get(handlers::ping))
        .route("/api/words", get(handlers::words))
        .route("/api/db/stats", get(handlers::db_stats))
        .route("/api/db/status", get(handlers::db_status))
        .route("/api/detect", post(handlers::detect))
        .merge(search_route)
        .merge(isearch_route)
        .merge(privileged)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
