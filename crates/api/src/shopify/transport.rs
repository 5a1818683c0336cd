//! HTTP transport for the Shopify Admin GraphQL endpoint.

use std::sync::Arc;

use catalog_provisioner_core::ShopDomain;
use graphql_client::GraphQLQuery;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{Span, instrument};
use url::Url;

use crate::config::ShopifyApiConfig;

use super::{CatalogApi, GraphQLError, ProvisionError, ShopSession};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin API transport.
///
/// One instance is shared by every request; it carries no shop or
/// credential state. Each call names its shop and token through a
/// [`ShopSession`].
#[derive(Clone)]
pub struct ShopifyTransport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    client: reqwest::Client,
    api_version: String,
    scheme: String,
}

impl ShopifyTransport {
    /// Create a transport with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyApiConfig) -> Result<Self, ProvisionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(TransportInner {
                client,
                api_version: config.api_version.clone(),
                scheme: config.scheme.clone(),
            }),
        })
    }

    /// The GraphQL endpoint for `shop`.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Transport` if the shop domain does not form a
    /// valid URL host.
    pub fn endpoint(&self, shop: &ShopDomain) -> Result<Url, ProvisionError> {
        let raw = format!(
            "{}://{}/admin/api/{}/graphql.json",
            self.inner.scheme, shop, self.inner.api_version
        );
        Url::parse(&raw)
            .map_err(|e| ProvisionError::Transport(format!("invalid endpoint {raw}: {e}")))
    }
}

impl CatalogApi for ShopifyTransport {
    #[instrument(
        skip(self, session, variables),
        fields(
            shop = %session.shop,
            operation = tracing::field::Empty,
            status = tracing::field::Empty,
        )
    )]
    async fn execute<Q>(
        &self,
        session: &ShopSession,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ProvisionError>
    where
        Q: GraphQLQuery,
        Q::Variables: Send,
        Q::ResponseData: Send,
    {
        let endpoint = self.endpoint(&session.shop)?;
        let body = Q::build_query(variables);
        Span::current().record("operation", body.operation_name);

        let response = self
            .inner
            .client
            .post(endpoint)
            .header(ACCESS_TOKEN_HEADER, session.access_token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        Span::current().record("status", status.as_u16());
        let bytes = response.bytes().await?;

        let Ok(payload) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            return Err(ProvisionError::Transport(format!(
                "HTTP {status} without a GraphQL body"
            )));
        };

        // A GraphQL error body wins over the status code so the raw errors
        // reach the caller even on 4xx/5xx.
        if let Some(err) = remote_errors(&payload) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(ProvisionError::Transport(format!("HTTP {status}")));
        }

        tracing::debug!(operation = body.operation_name, "Shopify operation succeeded");
        decode_response(payload)
    }
}

/// Classify a GraphQL response body and decode its `data`.
///
/// # Errors
///
/// - `ProvisionError::RemoteOperation` when `errors` is present and non-empty
/// - `ProvisionError::Integrity` when `data` is missing or does not match `T`
pub fn decode_response<T: DeserializeOwned>(
    payload: serde_json::Value,
) -> Result<T, ProvisionError> {
    if let Some(err) = remote_errors(&payload) {
        return Err(err);
    }

    let data = match payload {
        serde_json::Value::Object(mut map) => map.remove("data"),
        _ => None,
    };
    match data {
        None | Some(serde_json::Value::Null) => Err(ProvisionError::Integrity(
            "response contained no data".to_string(),
        )),
        Some(data) => serde_json::from_value(data)
            .map_err(|e| ProvisionError::Integrity(format!("malformed response data: {e}"))),
    }
}

/// Extract top-level `errors`, which Shopify sends either as a list of
/// objects or as a bare string.
fn remote_errors(payload: &serde_json::Value) -> Option<ProvisionError> {
    let raw = payload.get("errors")?;
    let errors: Vec<GraphQLError> = match raw {
        serde_json::Value::Null => return None,
        serde_json::Value::String(message) => vec![GraphQLError {
            message: message.clone(),
        }],
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| GraphQLError {
                message: item
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| item.to_string(), String::from),
            })
            .collect(),
        other => vec![GraphQLError {
            message: other.to_string(),
        }],
    };

    if errors.is_empty() {
        None
    } else {
        Some(ProvisionError::RemoteOperation {
            errors,
            raw: raw.clone(),
        })
    }
}
