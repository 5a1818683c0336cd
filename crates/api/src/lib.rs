//! Catalog Provisioner service library.
//!
//! Provisions fully populated products (options, variants, stock and media)
//! into a Shopify shop through the Admin GraphQL API.
//!
//! # Modules
//!
//! - [`shopify`] - Transport, operation definitions and the error taxonomy
//! - [`pipeline`] - The sequential provisioning stages
//! - [`db`] - Per-shop location bookkeeping
//! - [`routes`] - HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod shopify;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    with_middleware(routes::routes(), state)
}

/// Wrap `router` in the service middleware stack and attach `state`.
///
/// Panics inside handlers become a generic JSON 500.
pub fn with_middleware(router: Router<AppState>, state: AppState) -> Router {
    router
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        shop = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
