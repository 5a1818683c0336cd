//! Per-shop fulfillment location.

use tracing::instrument;

use crate::config::LocationProfile;
use crate::db::{LocationStore, NewLocation};
use crate::shopify::queries::{LocationAdd, location_add};
use crate::shopify::{CatalogApi, ProvisionError, ShopSession};

/// Get-or-create of the location that receives starting stock.
///
/// Concurrent first requests for the same shop may each create a remote
/// location; only the first one recorded locally is ever used.
pub struct LocationResolver<'a, A, S> {
    api: &'a A,
    store: &'a S,
    profile: &'a LocationProfile,
}

impl<'a, A, S> LocationResolver<'a, A, S>
where
    A: CatalogApi,
    S: LocationStore,
{
    #[must_use]
    pub const fn new(api: &'a A, store: &'a S, profile: &'a LocationProfile) -> Self {
        Self {
            api,
            store,
            profile,
        }
    }

    /// Remote location ID for the session's shop.
    ///
    /// # Errors
    ///
    /// - `ProvisionError::Validation` if `locationAdd` reports `userErrors`
    /// - `ProvisionError::Integrity` if the created location has no ID
    /// - `ProvisionError::Repository` if the local lookup or insert fails
    #[instrument(skip_all, fields(shop = %session.shop))]
    pub async fn resolve(&self, session: &ShopSession) -> Result<String, ProvisionError> {
        if let Some(existing) = self.store.find_by_shop(&session.shop).await? {
            tracing::debug!(
                location_id = %existing.shopify_location_id,
                "Reusing recorded location"
            );
            return Ok(existing.shopify_location_id);
        }

        let data = self
            .api
            .execute::<LocationAdd>(
                session,
                location_add::Variables {
                    input: location_add::LocationAddInput {
                        name: self.profile.name.clone(),
                        address: location_add::LocationAddAddressInput {
                            address1: self.profile.address1.clone(),
                            city: self.profile.city.clone(),
                            province_code: self.profile.province_code.clone(),
                            country_code: self.profile.country_code.clone(),
                            zip: self.profile.zip.clone(),
                        },
                    },
                },
            )
            .await?;

        let payload = data.location_add.ok_or_else(|| {
            ProvisionError::Integrity("locationAdd returned no payload".to_string())
        })?;
        ProvisionError::check_user_errors("locationAdd", payload.user_errors)?;
        let remote_id = payload.location.and_then(|l| l.id).ok_or_else(|| {
            ProvisionError::Integrity("Location ID missing in response".to_string())
        })?;

        let stored = self
            .store
            .insert(NewLocation::from_profile(
                session.shop.clone(),
                remote_id.clone(),
                self.profile,
            ))
            .await?;

        if stored.shopify_location_id == remote_id {
            tracing::info!(location_id = %remote_id, "Recorded new location");
        } else {
            // Lost the race: the created remote location stays unused.
            tracing::warn!(
                created = %remote_id,
                recorded = %stored.shopify_location_id,
                "Location already recorded by a concurrent request"
            );
        }
        Ok(stored.shopify_location_id)
    }
}
