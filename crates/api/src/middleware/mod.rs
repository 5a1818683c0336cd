//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)

pub mod request_id;
pub mod shop;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use shop::{ACCESS_TOKEN_HEADER, RequireShop, SHOP_DOMAIN_HEADER};
