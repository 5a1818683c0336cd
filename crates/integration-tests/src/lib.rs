//! Integration test support for the catalog provisioner.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-provisioner-integration-tests
//! ```
//!
//! No database or network access is needed: [`FakeShopify`] serves the Admin
//! GraphQL endpoint from an in-process axum server, and
//! [`MemoryLocationStore`] stands in for `PostgreSQL`.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use catalog_provisioner::config::ShopifyApiConfig;
use catalog_provisioner::db::{Location, LocationStore, NewLocation, RepositoryError};
use catalog_provisioner::shopify::ShopSession;
use catalog_provisioner_core::{LocationRecordId, ShopDomain};
use serde_json::Value;

// =============================================================================
// Fake Shopify
// =============================================================================

/// A scripted reply from [`FakeShopify`].
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// JSON body with a status code.
    Json(StatusCode, Value),
    /// Plain-text body with a status code.
    Text(StatusCode, String),
    /// Sleep before answering with the inner reply.
    Delayed(Duration, Box<FakeReply>),
}

impl FakeReply {
    /// `200 {"data": data}`.
    #[must_use]
    pub fn data(data: Value) -> Self {
        Self::Json(StatusCode::OK, serde_json::json!({ "data": data }))
    }
}

/// A request received by [`FakeShopify`].
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub operation: String,
    pub variables: Value,
    pub access_token: Option<String>,
}

#[derive(Default)]
struct FakeInner {
    replies: Mutex<HashMap<String, VecDeque<FakeReply>>>,
    received: Mutex<Vec<ReceivedRequest>>,
}

/// In-process stand-in for a shop's Admin GraphQL endpoint.
///
/// Replies are queued per `operationName`; an operation with nothing queued
/// gets `404 {"errors": [...]}`.
#[derive(Clone)]
pub struct FakeShopify {
    addr: SocketAddr,
    inner: Arc<FakeInner>,
}

impl FakeShopify {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let inner = Arc::new(FakeInner::default());
        let app = Router::new()
            .route("/admin/api/{version}/graphql.json", post(graphql))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, inner }
    }

    /// Queue a reply for `operation`.
    #[must_use]
    pub fn on(self, operation: &str, reply: FakeReply) -> Self {
        self.inner
            .replies
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a `data` reply for `operation`.
    #[must_use]
    pub fn on_data(self, operation: &str, data: Value) -> Self {
        self.on(operation, FakeReply::data(data))
    }

    /// The shop domain that routes to this server.
    #[must_use]
    pub fn shop(&self) -> ShopDomain {
        ShopDomain::parse(&self.addr.to_string()).unwrap()
    }

    /// A session for this server's shop.
    #[must_use]
    pub fn session(&self) -> ShopSession {
        ShopSession::new(self.shop(), "shpat_integration")
    }

    /// Every request received, in order.
    #[must_use]
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.inner.received.lock().unwrap().clone()
    }

    /// Requests for `operation`, in order.
    #[must_use]
    pub fn received_for(&self, operation: &str) -> Vec<ReceivedRequest> {
        self.received()
            .into_iter()
            .filter(|r| r.operation == operation)
            .collect()
    }
}

async fn graphql(
    State(inner): State<Arc<FakeInner>>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    inner.received.lock().unwrap().push(ReceivedRequest {
        path: uri.path().to_string(),
        operation: operation.clone(),
        variables: body["variables"].clone(),
        access_token: headers
            .get("x-shopify-access-token")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let reply = inner
        .replies
        .lock()
        .unwrap()
        .get_mut(&operation)
        .and_then(VecDeque::pop_front);

    match reply {
        Some(reply) => respond(reply).await,
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "errors": [{"message": format!("no reply scripted for {operation}")}]
            })),
        )
            .into_response(),
    }
}

async fn respond(mut reply: FakeReply) -> Response {
    loop {
        match reply {
            FakeReply::Json(status, body) => return (status, Json(body)).into_response(),
            FakeReply::Text(status, body) => return (status, body).into_response(),
            FakeReply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
        }
    }
}

/// Transport settings pointing at a [`FakeShopify`].
#[must_use]
pub fn fake_api_config() -> ShopifyApiConfig {
    ShopifyApiConfig {
        scheme: "http".to_string(),
        timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(1),
        ..ShopifyApiConfig::default()
    }
}

// =============================================================================
// In-memory location store
// =============================================================================

/// `LocationStore` backed by a `Vec`.
#[derive(Default)]
pub struct MemoryLocationStore {
    rows: Mutex<Vec<Location>>,
}

impl MemoryLocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocationStore for MemoryLocationStore {
    fn find_by_shop(
        &self,
        shop: &ShopDomain,
    ) -> impl Future<Output = Result<Option<Location>, RepositoryError>> + Send {
        let found = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| &l.shop == shop)
            .cloned();
        std::future::ready(Ok(found))
    }

    fn insert(
        &self,
        location: NewLocation,
    ) -> impl Future<Output = Result<Location, RepositoryError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|l| l.shop == location.shop) {
            return std::future::ready(Ok(existing.clone()));
        }

        let now = chrono::Utc::now();
        let row = Location {
            id: LocationRecordId::new(i32::try_from(rows.len()).unwrap() + 1),
            shop: location.shop,
            shopify_location_id: location.shopify_location_id,
            name: location.name,
            address1: Some(location.address1),
            city: Some(location.city),
            province_code: Some(location.province_code),
            country_code: Some(location.country_code),
            zip: Some(location.zip),
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        std::future::ready(Ok(row))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Canned submissions and Shopify payloads shared by the test files.
pub mod fixtures {
    use catalog_provisioner_core::ProductSubmission;
    use serde_json::{Value, json};

    /// A two-option tee with four variants, two of which carry images.
    #[must_use]
    pub fn tee_payload() -> Value {
        json!({
            "title": "Organic Tee",
            "bodyHtml": "<p>Heavyweight cotton.</p>",
            "vendor": "Acme",
            "productType": "Apparel",
            "tags": ["summer"],
            "options": [
                {"name": "Size", "values": ["S", "M"]},
                {"name": "Color", "values": ["Red", "Blue"]}
            ],
            "variants": [
                {"sku": "TEE-S-RED", "price": "25.00", "optionValues": ["S", "Red"],
                 "inventoryQuantity": 4, "image": {"src": "https://cdn.example.com/red.png",
                  "alt": "Red tee"}},
                {"sku": "TEE-S-BLUE", "price": "25.00", "optionValues": ["S", "Blue"],
                 "inventoryQuantity": 2},
                {"sku": "TEE-M-RED", "price": "27.50", "optionValues": ["M", "Red"]},
                {"sku": "TEE-M-BLUE", "price": "27.50", "optionValues": ["M", "Blue"],
                 "image": {"src": "https://cdn.example.com/blue.png"}}
            ],
            "images": [{"src": "https://cdn.example.com/gallery.png", "alt": "Flat lay"}]
        })
    }

    #[must_use]
    pub fn tee_submission() -> ProductSubmission {
        serde_json::from_value(tee_payload()).unwrap()
    }

    #[must_use]
    pub fn product_created() -> Value {
        json!({"productCreate": {
            "product": {
                "id": "gid://shopify/Product/100",
                "handle": "organic-tee",
                "options": [
                    {"id": "gid://shopify/ProductOption/1", "name": "Size"},
                    {"id": "gid://shopify/ProductOption/2", "name": "Color"}
                ]
            },
            "userErrors": []
        }})
    }

    #[must_use]
    pub fn location_added() -> Value {
        json!({"locationAdd": {
            "location": {"id": "gid://shopify/Location/55", "name": "New York Shop"},
            "userErrors": []
        }})
    }

    #[must_use]
    pub fn primary_location() -> Value {
        json!({"location": {"id": "gid://shopify/Location/1"}})
    }

    #[must_use]
    pub fn variants_created() -> Value {
        json!({"productVariantsBulkCreate": {
            "productVariants": [
                {"id": "gid://shopify/ProductVariant/11", "sku": "TEE-S-RED",
                 "inventoryItem": {"id": "gid://shopify/InventoryItem/11"}},
                {"id": "gid://shopify/ProductVariant/12", "sku": "TEE-S-BLUE",
                 "inventoryItem": {"id": "gid://shopify/InventoryItem/12"}},
                {"id": "gid://shopify/ProductVariant/13", "sku": "TEE-M-RED",
                 "inventoryItem": {"id": "gid://shopify/InventoryItem/13"}},
                {"id": "gid://shopify/ProductVariant/14", "sku": "TEE-M-BLUE",
                 "inventoryItem": {"id": "gid://shopify/InventoryItem/14"}}
            ],
            "userErrors": []
        }})
    }

    #[must_use]
    pub fn media_created() -> Value {
        json!({"productCreateMedia": {
            "media": [
                {"id": "gid://shopify/MediaImage/21", "alt": "Red tee", "status": "UPLOADED"},
                {"id": "gid://shopify/MediaImage/22", "alt": null, "status": "UPLOADED"},
                {"id": "gid://shopify/MediaImage/23", "alt": "Flat lay", "status": "PROCESSING"}
            ],
            "mediaUserErrors": []
        }})
    }

    #[must_use]
    pub fn media_linked() -> Value {
        json!({"productVariantAppendMedia": {"userErrors": []}})
    }

    #[must_use]
    pub fn inventory_activated() -> Value {
        json!({"inventoryActivate": {"inventoryLevel": {"id": "gid://shopify/InventoryLevel/1"},
         "userErrors": []}})
    }

    #[must_use]
    pub fn product_deleted() -> Value {
        json!({"productDelete": {"deletedProductId": "gid://shopify/Product/100",
         "userErrors": []}})
    }
}
