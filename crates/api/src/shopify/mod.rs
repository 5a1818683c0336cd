//! Shopify Admin API access for product provisioning.
//!
//! # Architecture
//!
//! - Operations are typed through `graphql_client::GraphQLQuery` (see [`queries`])
//! - [`ShopifyTransport`] executes one operation per call against a shop-scoped
//!   endpoint with a per-call access token; no retries
//! - Every failure is a [`ProvisionError`], the single discriminator used by
//!   all pipeline stages
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_provisioner::shopify::{CatalogApi, ShopSession, ShopifyTransport};
//!
//! let transport = ShopifyTransport::new(&config.shopify)?;
//! let session = ShopSession::new(shop, access_token);
//! let data = transport
//!     .execute::<GetProducts>(
//!         &session,
//!         get_products::Variables { first: 25, after: None, query: None },
//!     )
//!     .await?;
//! ```

pub mod queries;
mod transport;
pub mod types;

use std::future::Future;

use catalog_provisioner_core::ShopDomain;
use graphql_client::GraphQLQuery;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::RepositoryError;

pub use transport::{ShopifyTransport, decode_response};
pub use types::*;

/// Errors that can occur while provisioning against the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Network failure, timeout, or an HTTP failure without a GraphQL body.
    #[error("Shopify request failed: {0}")]
    Transport(String),

    /// The response carried a top-level GraphQL `errors` list.
    #[error("GraphQL errors from Shopify: {}", format_graphql_errors(.errors))]
    RemoteOperation {
        errors: Vec<GraphQLError>,
        /// The `errors` payload exactly as Shopify sent it.
        raw: serde_json::Value,
    },

    /// The operation reported field-level `userErrors`.
    #[error("Shopify userErrors on {operation}: {}", format_user_errors(.errors))]
    Validation {
        operation: &'static str,
        errors: Vec<UserError>,
    },

    /// An identifier the pipeline depends on was missing from a response.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Location bookkeeping failed.
    #[error("Location store error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<reqwest::Error> for ProvisionError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        Self::Transport(format!("{kind}: {err}"))
    }
}

impl ProvisionError {
    /// Build a validation error from an operation's `userErrors`, if any.
    pub(crate) fn check_user_errors(
        operation: &'static str,
        errors: Vec<UserError>,
    ) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation { operation, errors })
        }
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A field-level error scoped to one mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field, if Shopify reported one.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl UserError {
    /// Create a user error for `field` (dot-separated).
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: Some(field.split('.').map(String::from).collect()),
            message: message.to_string(),
        }
    }
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            if field.is_empty() {
                e.message.clone()
            } else {
                format!("{field}: {}", e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// The shop and credential a single request operates on.
///
/// Built per inbound request; the token is never cached or shared across shops.
#[derive(Clone)]
pub struct ShopSession {
    pub shop: ShopDomain,
    pub access_token: SecretString,
}

impl ShopSession {
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: impl Into<String>) -> Self {
        Self {
            shop,
            access_token: SecretString::from(access_token.into()),
        }
    }
}

impl std::fmt::Debug for ShopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopSession")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Executes typed GraphQL operations against a shop's catalog.
pub trait CatalogApi: Send + Sync {
    /// Execute one operation and return its `data`.
    ///
    /// Implementations must classify top-level `errors` as
    /// [`ProvisionError::RemoteOperation`] and network failures as
    /// [`ProvisionError::Transport`]. Field-level `userErrors` are left in the
    /// returned data for the caller to inspect.
    fn execute<Q>(
        &self,
        session: &ShopSession,
        variables: Q::Variables,
    ) -> impl Future<Output = Result<Q::ResponseData, ProvisionError>> + Send
    where
        Q: GraphQLQuery,
        Q::Variables: Send,
        Q::ResponseData: Send;
}
