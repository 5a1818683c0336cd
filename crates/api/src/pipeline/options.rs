//! Option value ownership.

use std::collections::HashMap;

use catalog_provisioner_core::{ProductOption, ProductSubmission, VariantSubmission};

use crate::shopify::RemoteProduct;
use crate::shopify::queries::product_variants_bulk_create::VariantOptionValueInput;

/// Value sent for an option that no variant supplies.
pub const PLACEHOLDER_OPTION_VALUE: &str = "Default";

/// Distinct values at `position` across all variants, in first-appearance order.
pub(crate) fn position_values(submission: &ProductSubmission, position: usize) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in submission
        .variants
        .iter()
        .filter_map(|v| v.option_values.get(position))
    {
        if !value.is_empty() && !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
}

/// Maps variant option values to remote option IDs.
///
/// A value belongs to the first declared option whose value set contains it.
/// An option's value set is its declared values, or the values variants
/// supplied at its position when none were declared.
#[derive(Debug, Clone)]
pub struct OptionIndex {
    option_ids: HashMap<String, String>,
    value_sets: Vec<ProductOption>,
}

impl OptionIndex {
    /// Build the index from the submission and the created product.
    #[must_use]
    pub fn build(submission: &ProductSubmission, product: &RemoteProduct) -> Self {
        let option_ids = product
            .options
            .iter()
            .map(|o| (o.name.clone(), o.id.clone()))
            .collect();

        let value_sets = submission
            .options
            .iter()
            .enumerate()
            .map(|(position, option)| {
                if option.values.is_empty() {
                    ProductOption {
                        name: option.name.clone(),
                        values: position_values(submission, position),
                    }
                } else {
                    option.clone()
                }
            })
            .collect();

        Self {
            option_ids,
            value_sets,
        }
    }

    /// Remote ID of the option named `name`.
    #[must_use]
    pub fn option_id(&self, name: &str) -> Option<&str> {
        self.option_ids.get(name).map(String::as_str)
    }

    /// Name of the option that owns `value`.
    #[must_use]
    pub fn owner_of(&self, value: &str) -> Option<&str> {
        self.value_sets
            .iter()
            .find(|option| option.accepts(value))
            .map(|option| option.name.as_str())
    }

    /// Option links for one variant.
    ///
    /// Values without an owner, or whose owner is missing from the created
    /// product, are dropped.
    #[must_use]
    pub fn option_values_for(&self, variant: &VariantSubmission) -> Vec<VariantOptionValueInput> {
        variant
            .option_values
            .iter()
            .filter_map(|value| {
                let Some(owner) = self.owner_of(value) else {
                    tracing::debug!(
                        sku = %variant.sku,
                        value,
                        "Option value matches no declared option"
                    );
                    return None;
                };
                let Some(option_id) = self.option_id(owner) else {
                    tracing::debug!(
                        sku = %variant.sku,
                        option = owner,
                        "Option missing from created product"
                    );
                    return None;
                };
                Some(VariantOptionValueInput {
                    name: value.clone(),
                    option_id: option_id.to_string(),
                })
            })
            .collect()
    }
}
