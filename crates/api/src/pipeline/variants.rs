//! Bulk variant creation.

use std::collections::BTreeMap;

use catalog_provisioner_core::ProductSubmission;
use tracing::instrument;

use super::options::OptionIndex;
use crate::shopify::queries::product_variants_bulk_create::{
    BulkCreateStrategy, InventoryItemInput, InventoryLevelInput, VariantInput,
};
use crate::shopify::queries::{ProductVariantsBulkCreate, product_variants_bulk_create};
use crate::shopify::{CatalogApi, ProvisionError, RemoteVariant, ShopSession};

/// Per-variant bulk inputs.
///
/// Starting stock is only included when `location_id` is given and the
/// variant declares a quantity.
#[must_use]
pub fn build_variant_inputs(
    submission: &ProductSubmission,
    index: &OptionIndex,
    location_id: Option<&str>,
) -> Vec<VariantInput> {
    submission
        .variants
        .iter()
        .map(|variant| {
            let inventory_quantities = match (variant.inventory_quantity, location_id) {
                (Some(quantity), Some(location)) => vec![InventoryLevelInput {
                    available_quantity: quantity,
                    location_id: location.to_string(),
                }],
                _ => Vec::new(),
            };

            VariantInput {
                price: variant.price,
                inventory_item: InventoryItemInput {
                    sku: variant.sku.clone(),
                },
                inventory_quantities,
                option_values: index.option_values_for(variant),
            }
        })
        .collect()
}

/// Creates all variants of a product in one mutation.
pub struct VariantProvisioner<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> VariantProvisioner<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Create every variant, replacing the standalone variant made with the
    /// product.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Validation` if Shopify reports `userErrors`.
    #[instrument(
        skip_all,
        fields(shop = %session.shop, product_id = %product_id, variants = submission.variants.len())
    )]
    pub async fn create(
        &self,
        session: &ShopSession,
        product_id: &str,
        submission: &ProductSubmission,
        index: &OptionIndex,
        location_id: Option<&str>,
    ) -> Result<BTreeMap<String, RemoteVariant>, ProvisionError> {
        let data = self
            .api
            .execute::<ProductVariantsBulkCreate>(
                session,
                product_variants_bulk_create::Variables {
                    product_id: product_id.to_string(),
                    variants: build_variant_inputs(submission, index, location_id),
                    strategy: Some(BulkCreateStrategy::RemoveStandaloneVariant),
                },
            )
            .await?;

        let payload = data.product_variants_bulk_create.ok_or_else(|| {
            ProvisionError::Integrity("productVariantsBulkCreate returned no payload".to_string())
        })?;
        ProvisionError::check_user_errors("productVariantsBulkCreate", payload.user_errors)?;

        let created: BTreeMap<String, RemoteVariant> = payload
            .product_variants
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| {
                let sku = v.sku?;
                Some((
                    sku.clone(),
                    RemoteVariant {
                        id: v.id,
                        sku,
                        inventory_item_id: v.inventory_item.map(|i| i.id),
                    },
                ))
            })
            .collect();

        tracing::debug!(created = created.len(), "Variants created");
        Ok(created)
    }
}
