//! # Greenlight Server
//!
//! JSON HTTP API over the Greenlight movie catalogue.
//!
//! Every request body goes through [`StrictJson`](infra::json::StrictJson)
//! and every response, errors included, is rendered by
//! [`write_json`](infra::json::write_json) as a tab-indented envelope.
//! Handlers reach storage through the
//! [`MoviesRepository`](greenlight_core::database::ports::movies::MoviesRepository)
//! port held in [`AppState`], so the router runs the same against PostgreSQL
//! or the in-memory store.

use std::any::Any;

use axum::{
    Router,
    response::{IntoResponse, Response},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use infra::errors::AppError;

/// Reported by the health check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The complete application with middleware and state applied.
pub fn create_app(state: AppState) -> Router {
    with_middleware(routes::create_api_router()).with_state(state)
}

/// Fallback, panic recovery and request tracing around `router`.
pub fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .fallback(handlers::not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(panic = detail, "request handler panicked");

    AppError::panicked().into_response()
}
