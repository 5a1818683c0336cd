//! In-process fakes for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use catalog_provisioner_core::{LocationRecordId, ShopDomain};
use chrono::Utc;
use graphql_client::GraphQLQuery;

use crate::db::{Location, LocationStore, NewLocation, RepositoryError};
use crate::shopify::{CatalogApi, ProvisionError, ShopSession, decode_response};

/// A recorded call against [`ScriptedCatalog`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub variables: serde_json::Value,
}

/// A `CatalogApi` that answers from per-operation queues.
///
/// Replies are full GraphQL bodies, decoded with the same classification as
/// the real transport. An operation with an empty queue fails as a transport
/// error.
#[derive(Default)]
pub struct ScriptedCatalog {
    replies: Mutex<HashMap<&'static str, VecDeque<Result<serde_json::Value, ProvisionError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful `data` payload for `operation`.
    pub fn reply(self, operation: &'static str, data: serde_json::Value) -> Self {
        self.push(operation, Ok(serde_json::json!({ "data": data })))
    }

    /// Queue a full response body (e.g. one carrying top-level `errors`).
    pub fn reply_raw(self, operation: &'static str, body: serde_json::Value) -> Self {
        self.push(operation, Ok(body))
    }

    /// Queue a failure for `operation`.
    pub fn fail(self, operation: &'static str, err: ProvisionError) -> Self {
        self.push(operation, Err(err))
    }

    fn push(
        self,
        operation: &'static str,
        reply: Result<serde_json::Value, ProvisionError>,
    ) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Variables sent to `operation`, in call order.
    pub fn calls_to(&self, operation: &str) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .map(|c| c.variables)
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls_to(operation).len()
    }
}

impl CatalogApi for ScriptedCatalog {
    fn execute<Q>(
        &self,
        _session: &ShopSession,
        variables: Q::Variables,
    ) -> impl Future<Output = Result<Q::ResponseData, ProvisionError>> + Send
    where
        Q: GraphQLQuery,
        Q::Variables: Send,
        Q::ResponseData: Send,
    {
        let body = Q::build_query(variables);
        let operation = body.operation_name;
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            variables: serde_json::to_value(&body.variables).unwrap(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(ProvisionError::Transport(format!(
                    "no scripted reply for {operation}"
                )))
            });

        std::future::ready(reply.and_then(decode_response::<Q::ResponseData>))
    }
}

/// In-memory `LocationStore`.
///
/// A row queued with [`MemoryLocationStore::with_concurrent_insert`] stays
/// invisible to lookups and lands just before the next insert, the way a
/// competing request's write would.
#[derive(Default)]
pub struct MemoryLocationStore {
    rows: Mutex<Vec<Location>>,
    concurrent: Mutex<Option<NewLocation>>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate another request recording `location` between our lookup
    /// and our insert.
    pub fn with_concurrent_insert(self, location: NewLocation) -> Self {
        *self.concurrent.lock().unwrap() = Some(location);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn keep_first(rows: &mut Vec<Location>, location: NewLocation) -> Location {
        if let Some(existing) = rows.iter().find(|l| l.shop == location.shop) {
            return existing.clone();
        }
        let now = Utc::now();
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
        row
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
        if let Some(winner) = self.concurrent.lock().unwrap().take() {
            Self::keep_first(&mut rows, winner);
        }
        std::future::ready(Ok(Self::keep_first(&mut rows, location)))
    }
}

/// A session for `demo.myshopify.com`.
pub fn session() -> ShopSession {
    ShopSession::new(
        ShopDomain::parse("demo.myshopify.com").unwrap(),
        "shpat_test_token",
    )
}
