//! Fulfillment location bookkeeping.
//!
//! Each shop gets exactly one local row naming the remote location created on
//! its behalf. Rows are written once and never updated by the pipeline.

use std::future::Future;

use catalog_provisioner_core::{LocationRecordId, ShopDomain};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use super::RepositoryError;
use crate::config::LocationProfile;

// =============================================================================
// Types
// =============================================================================

/// A persisted fulfillment location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: LocationRecordId,
    pub shop: ShopDomain,
    /// Remote location ID (`gid://shopify/Location/...`).
    pub shopify_location_id: String,
    pub name: String,
    pub address1: Option<String>,
    pub city: Option<String>,
    pub province_code: Option<String>,
    pub country_code: Option<String>,
    pub zip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A location to record after it was created remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub shop: ShopDomain,
    pub shopify_location_id: String,
    pub name: String,
    pub address1: String,
    pub city: String,
    pub province_code: String,
    pub country_code: String,
    pub zip: String,
}

impl NewLocation {
    /// Describe a location created from `profile`.
    #[must_use]
    pub fn from_profile(
        shop: ShopDomain,
        shopify_location_id: impl Into<String>,
        profile: &LocationProfile,
    ) -> Self {
        Self {
            shop,
            shopify_location_id: shopify_location_id.into(),
            name: profile.name.clone(),
            address1: profile.address1.clone(),
            city: profile.city.clone(),
            province_code: profile.province_code.clone(),
            country_code: profile.country_code.clone(),
            zip: profile.zip.clone(),
        }
    }
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: i32,
    shop_domain: String,
    shopify_location_id: String,
    name: String,
    address1: Option<String>,
    city: Option<String>,
    province_code: Option<String>,
    country_code: Option<String>,
    zip: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LocationRow> for Location {
    type Error = RepositoryError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let shop = ShopDomain::parse(&row.shop_domain).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "location {} has invalid shop domain: {e}",
                row.id
            ))
        })?;

        Ok(Self {
            id: LocationRecordId::new(row.id),
            shop,
            shopify_location_id: row.shopify_location_id,
            name: row.name,
            address1: row.address1,
            city: row.city,
            province_code: row.province_code,
            country_code: row.country_code,
            zip: row.zip,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Persistence seam for per-shop locations.
pub trait LocationStore: Send + Sync {
    /// Find the location recorded for `shop`.
    fn find_by_shop(
        &self,
        shop: &ShopDomain,
    ) -> impl Future<Output = Result<Option<Location>, RepositoryError>> + Send;

    /// Record a location, keeping the existing row if `shop` already has one.
    ///
    /// Returns whichever row is stored for the shop afterwards.
    fn insert(
        &self,
        location: NewLocation,
    ) -> impl Future<Output = Result<Location, RepositoryError>> + Send;
}

const SELECT_COLUMNS: &str = r"
    SELECT
        id,
        shop_domain,
        shopify_location_id,
        name,
        address1,
        city,
        province_code,
        country_code,
        zip,
        created_at,
        updated_at
    FROM shopify_locations
";

/// Repository for location database operations.
pub struct LocationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LocationRepository<'a> {
    /// Create a new location repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every recorded location, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Location::try_from).collect()
    }

    /// Forget the location recorded for `shop`.
    ///
    /// The remote location is left untouched; the next provisioning request
    /// for the shop creates a new one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row exists for the shop.
    pub async fn delete_by_shop(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopify_locations WHERE shop_domain = $1")
            .bind(shop.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl LocationStore for LocationRepository<'_> {
    async fn find_by_shop(&self, shop: &ShopDomain) -> Result<Option<Location>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(&format!(
            "{SELECT_COLUMNS} WHERE shop_domain = $1"
        ))
        .bind(shop.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Location::try_from).transpose()
    }

    async fn insert(&self, location: NewLocation) -> Result<Location, RepositoryError> {
        let inserted = sqlx::query_as::<_, LocationRow>(
            r"
            INSERT INTO shopify_locations
                (shop_domain, shopify_location_id, name, address1, city,
                 province_code, country_code, zip)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (shop_domain) DO NOTHING
            RETURNING
                id, shop_domain, shopify_location_id, name, address1, city,
                province_code, country_code, zip, created_at, updated_at
            ",
        )
        .bind(location.shop.as_str())
        .bind(&location.shopify_location_id)
        .bind(&location.name)
        .bind(&location.address1)
        .bind(&location.city)
        .bind(&location.province_code)
        .bind(&location.country_code)
        .bind(&location.zip)
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            return Location::try_from(row);
        }

        // Lost a race with a concurrent first request; the earlier row wins.
        tracing::debug!(
            shop = %location.shop,
            discarded_location_id = %location.shopify_location_id,
            "Location already recorded for shop, keeping existing row"
        );
        self.find_by_shop(&location.shop)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
