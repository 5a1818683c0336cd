//! Location bookkeeping commands.
//!
//! # Usage
//!
//! ```bash
//! provisioner-cli locations list
//! provisioner-cli locations forget demo.myshopify.com
//! ```
//!
//! Forgetting a location only removes the local row; the remote location is
//! left in the shop.

use catalog_provisioner::db::{LocationRepository, RepositoryError};
use catalog_provisioner_core::ShopDomain;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use super::{CommandError, database_url};

/// Errors from location commands.
#[derive(Debug, Error)]
pub enum LocationCommandError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Invalid shop domain: {0}")]
    InvalidShop(String),

    #[error("No location recorded for {0}")]
    NotRecorded(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

async fn connect() -> Result<PgPool, LocationCommandError> {
    let database_url = database_url()?;
    PgPool::connect(database_url.expose_secret())
        .await
        .map_err(|e| CommandError::Database(e).into())
}

/// Print every recorded location.
///
/// # Errors
///
/// Returns `LocationCommandError` if the database query fails.
pub async fn list() -> Result<(), LocationCommandError> {
    let pool = connect().await?;
    let locations = LocationRepository::new(&pool).list_all().await?;

    #[allow(clippy::print_stdout)]
    {
        if locations.is_empty() {
            println!("No locations recorded.");
        }
        for location in &locations {
            println!(
                "{}\t{}\t{}\t{}",
                location.shop,
                location.shopify_location_id,
                location.name,
                location.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    tracing::info!(count = locations.len(), "Listed locations");
    Ok(())
}

/// Remove the location recorded for `shop`.
///
/// # Errors
///
/// Returns `LocationCommandError::NotRecorded` if the shop has no row.
pub async fn forget(shop: &str) -> Result<(), LocationCommandError> {
    let shop =
        ShopDomain::parse(shop).map_err(|e| LocationCommandError::InvalidShop(e.to_string()))?;
    let pool = connect().await?;

    match LocationRepository::new(&pool).delete_by_shop(&shop).await {
        Ok(()) => {
            tracing::info!(shop = %shop, "Location forgotten");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(LocationCommandError::NotRecorded(shop.into_inner())),
        Err(e) => Err(e.into()),
    }
}
