//! Read-only product listing.

use serde::Deserialize;
use tracing::instrument;

use crate::shopify::queries::{GetProducts, get_products};
use crate::shopify::{CatalogApi, ProductPage, ProductSummary, ProvisionError, ShopSession};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 250;

/// Listing parameters, as accepted on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductQuery {
    pub first: Option<u32>,
    /// Cursor from a previous page's `end_cursor`.
    pub after: Option<String>,
    /// Shopify search syntax, e.g. `vendor:Acme`.
    pub query: Option<String>,
}

impl ProductQuery {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.first
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Lists existing products.
pub struct ProductLister<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> ProductLister<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError` if the remote call fails.
    #[instrument(skip_all, fields(shop = %session.shop, first = query.page_size()))]
    pub async fn list(
        &self,
        session: &ShopSession,
        query: &ProductQuery,
    ) -> Result<ProductPage, ProvisionError> {
        let data = self
            .api
            .execute::<GetProducts>(
                session,
                get_products::Variables {
                    first: i64::from(query.page_size()),
                    after: query.after.clone().filter(|s| !s.is_empty()),
                    query: query.query.clone().filter(|s| !s.is_empty()),
                },
            )
            .await?;

        let connection = data.products;
        Ok(ProductPage {
            products: connection
                .nodes
                .into_iter()
                .map(|n| ProductSummary {
                    id: n.id,
                    title: n.title,
                    handle: n.handle,
                    status: n.status,
                    vendor: n.vendor,
                    product_type: n.product_type,
                })
                .collect(),
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use catalog_provisioner_core::ProductStatus;
    use serde_json::json;

    use super::*;
    use crate::testing::{ScriptedCatalog, session};

    #[test]
    fn test_page_size_defaults_and_caps() {
        assert_eq!(ProductQuery::default().page_size(), 25);
        let big = ProductQuery {
            first: Some(1000),
            ..ProductQuery::default()
        };
        assert_eq!(big.page_size(), 250);
        let zero = ProductQuery {
            first: Some(0),
            ..ProductQuery::default()
        };
        assert_eq!(zero.page_size(), 1);
    }

    #[tokio::test]
    async fn test_list_maps_page() {
        let api = ScriptedCatalog::new().reply(
            get_products::OPERATION_NAME,
            json!({"products": {
                "nodes": [{
                    "id": "gid://shopify/Product/1",
                    "title": "Tee",
                    "handle": "tee",
                    "status": "ACTIVE",
                    "vendor": "Acme",
                    "productType": null
                }],
                "pageInfo": {"hasNextPage": true, "endCursor": "abc"}
            }}),
        );
        let query = ProductQuery {
            first: Some(10),
            after: Some(String::new()),
            query: Some("vendor:Acme".to_string()),
        };

        let page = ProductLister::new(&api).list(&session(), &query).await.unwrap();

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].status, ProductStatus::Active);
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("abc"));
        assert_eq!(
            api.calls_to(get_products::OPERATION_NAME)[0],
            json!({"first": 10, "after": null, "query": "vendor:Acme"})
        );
    }
}
