//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Products (requires X-Shopify-Shop-Domain and X-Shopify-Access-Token)
//! POST /shopify/products       - Provision a product from a submission
//! GET  /shopify/products       - List existing products (?first&after&query)
//! ```

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the complete route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
}
