//! Per-variant stock activation.

use std::collections::BTreeMap;

use catalog_provisioner_core::ProductSubmission;
use tracing::instrument;

use crate::shopify::queries::{
    GetPrimaryLocation, InventoryActivate, get_primary_location, inventory_activate,
};
use crate::shopify::{CatalogApi, ProvisionError, RemoteVariant, ShopSession};

/// Outcome of an activation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryActivation {
    /// Primary location, if any variant needed stock.
    pub location_id: Option<String>,
    /// Whether at least one variant was activated.
    pub applied: bool,
}

/// Activates starting stock at the shop's primary location.
pub struct InventorySetter<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> InventorySetter<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Activate every variant that declares a quantity.
    ///
    /// Per-variant `userErrors` are logged and do not fail the pass.
    ///
    /// # Errors
    ///
    /// Transport and GraphQL failures abort the pass. Returns
    /// `ProvisionError::Integrity` if the shop reports no primary location.
    #[instrument(skip_all, fields(shop = %session.shop))]
    pub async fn apply(
        &self,
        session: &ShopSession,
        submission: &ProductSubmission,
        variants: &BTreeMap<String, RemoteVariant>,
    ) -> Result<InventoryActivation, ProvisionError> {
        let pending: Vec<(&str, i64)> = submission
            .variants
            .iter()
            .filter_map(|v| v.inventory_quantity.map(|q| (v.sku.as_str(), q)))
            .collect();
        if pending.is_empty() {
            return Ok(InventoryActivation::default());
        }

        let location_id = self
            .api
            .execute::<GetPrimaryLocation>(session, get_primary_location::Variables {})
            .await?
            .location
            .and_then(|l| l.id)
            .ok_or_else(|| ProvisionError::Integrity("Primary location missing".to_string()))?;

        let mut applied = false;
        for (sku, quantity) in pending {
            let Some(inventory_item_id) = variants
                .get(sku)
                .and_then(|v| v.inventory_item_id.clone())
            else {
                tracing::warn!(sku, "No inventory item for variant, skipping activation");
                continue;
            };

            let data = self
                .api
                .execute::<InventoryActivate>(
                    session,
                    inventory_activate::Variables {
                        inventory_item_id,
                        location_id: location_id.clone(),
                        available: Some(quantity),
                    },
                )
                .await?;

            match data.inventory_activate {
                Some(payload) if payload.user_errors.is_empty() => applied = true,
                Some(payload) => {
                    let err = ProvisionError::Validation {
                        operation: "inventoryActivate",
                        errors: payload.user_errors,
                    };
                    tracing::warn!(sku, error = %err, "Inventory activation rejected");
                }
                None => tracing::warn!(sku, "inventoryActivate returned no payload"),
            }
        }

        Ok(InventoryActivation {
            location_id: Some(location_id),
            applied,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use catalog_provisioner_core::VariantSubmission;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::testing::{ScriptedCatalog, session};

    fn submission(quantities: &[(&str, Option<i64>)]) -> ProductSubmission {
        ProductSubmission {
            title: "Tee".to_string(),
            description: None,
            vendor: None,
            product_type: None,
            tags: vec![],
            options: vec![],
            variants: quantities
                .iter()
                .map(|(sku, q)| VariantSubmission {
                    sku: (*sku).to_string(),
                    price: Decimal::ONE,
                    option_values: vec![],
                    inventory_quantity: *q,
                    image: None,
                })
                .collect(),
            images: vec![],
        }
    }

    fn variants(skus: &[&str]) -> BTreeMap<String, RemoteVariant> {
        skus.iter()
            .enumerate()
            .map(|(i, sku)| {
                (
                    (*sku).to_string(),
                    RemoteVariant {
                        id: format!("gid://shopify/ProductVariant/{i}"),
                        sku: (*sku).to_string(),
                        inventory_item_id: Some(format!("gid://shopify/InventoryItem/{i}")),
                    },
                )
            })
            .collect()
    }

    fn primary() -> serde_json::Value {
        json!({"location": {"id": "gid://shopify/Location/1"}})
    }

    #[tokio::test]
    async fn test_no_quantities_makes_no_calls() {
        let api = ScriptedCatalog::new();
        let outcome = InventorySetter::new(&api)
            .apply(&session(), &submission(&[("A", None)]), &variants(&["A"]))
            .await
            .unwrap();

        assert_eq!(outcome, InventoryActivation::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_activates_each_variant_with_quantity() {
        let api = ScriptedCatalog::new()
            .reply(get_primary_location::OPERATION_NAME, primary())
            .reply(
                inventory_activate::OPERATION_NAME,
                json!({"inventoryActivate": {"inventoryLevel": {"id": "lvl-1"}, "userErrors": []}}),
            );

        let outcome = InventorySetter::new(&api)
            .apply(
                &session(),
                &submission(&[("A", None), ("B", Some(12))]),
                &variants(&["A", "B"]),
            )
            .await
            .unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.location_id.as_deref(), Some("gid://shopify/Location/1"));
        let calls = api.calls_to(inventory_activate::OPERATION_NAME);
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            json!({
                "inventoryItemId": "gid://shopify/InventoryItem/1",
                "locationId": "gid://shopify/Location/1",
                "available": 12
            })
        );
    }

    #[tokio::test]
    async fn test_user_errors_fold_into_aggregate() {
        let api = ScriptedCatalog::new()
            .reply(get_primary_location::OPERATION_NAME, primary())
            .reply(
                inventory_activate::OPERATION_NAME,
                json!({"inventoryActivate": {
                    "inventoryLevel": null,
                    "userErrors": [{"field": ["inventoryItemId"], "message": "Item is not stocked"}]
                }}),
            );

        let outcome = InventorySetter::new(&api)
            .apply(&session(), &submission(&[("A", Some(1))]), &variants(&["A"]))
            .await
            .unwrap();

        assert!(!outcome.applied);
    }

    #[tokio::test]
    async fn test_remote_errors_abort() {
        let api = ScriptedCatalog::new()
            .reply(get_primary_location::OPERATION_NAME, primary())
            .reply_raw(
                inventory_activate::OPERATION_NAME,
                json!({"errors": [{"message": "Access denied for inventoryActivate field."}]}),
            );

        let err = InventorySetter::new(&api)
            .apply(&session(), &submission(&[("A", Some(1))]), &variants(&["A"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::RemoteOperation { .. }));
    }
}
