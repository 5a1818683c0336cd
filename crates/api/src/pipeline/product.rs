//! Product creation and deletion.

use catalog_provisioner_core::ProductSubmission;
use tracing::instrument;

use super::options::{PLACEHOLDER_OPTION_VALUE, position_values};
use crate::shopify::queries::product_create::{
    OptionCreateInput, OptionValueCreateInput, ProductCreateInput,
};
use crate::shopify::queries::{ProductCreate, ProductDelete, product_create, product_delete};
use crate::shopify::{CatalogApi, ProvisionError, RemoteOption, RemoteProduct, ShopSession};

/// Option schema for `productCreate`.
///
/// Each declared option carries the distinct values variants supply at its
/// position, or a single placeholder when none do.
#[must_use]
pub fn build_product_options(submission: &ProductSubmission) -> Vec<OptionCreateInput> {
    submission
        .options
        .iter()
        .enumerate()
        .map(|(position, option)| {
            let mut values = position_values(submission, position);
            if values.is_empty() {
                values.push(PLACEHOLDER_OPTION_VALUE.to_string());
            }
            OptionCreateInput {
                name: option.name.clone(),
                values: values
                    .into_iter()
                    .map(|name| OptionValueCreateInput { name })
                    .collect(),
            }
        })
        .collect()
}

/// Full `productCreate` input for a submission.
#[must_use]
pub fn build_product_input(submission: &ProductSubmission) -> ProductCreateInput {
    ProductCreateInput {
        title: submission.title.clone(),
        description_html: submission.description.clone(),
        vendor: submission.vendor.clone(),
        product_type: submission.product_type.clone(),
        tags: submission.tags.clone(),
        product_options: build_product_options(submission),
    }
}

fn missing_product_id() -> ProvisionError {
    ProvisionError::Integrity("Product ID missing in response".to_string())
}

/// Creates (and, for compensation, deletes) products.
pub struct ProductCreator<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> ProductCreator<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Create the product and its option schema.
    ///
    /// # Errors
    ///
    /// - `ProvisionError::Validation` if Shopify reports `userErrors`
    /// - `ProvisionError::Integrity` if the response has no product ID
    #[instrument(skip_all, fields(shop = %session.shop, options = submission.options.len()))]
    pub async fn create(
        &self,
        session: &ShopSession,
        submission: &ProductSubmission,
    ) -> Result<RemoteProduct, ProvisionError> {
        let data = self
            .api
            .execute::<ProductCreate>(
                session,
                product_create::Variables {
                    product: build_product_input(submission),
                },
            )
            .await?;

        let payload = data.product_create.ok_or_else(|| {
            ProvisionError::Integrity("productCreate returned no payload".to_string())
        })?;
        ProvisionError::check_user_errors("productCreate", payload.user_errors)?;

        let product = payload.product.ok_or_else(missing_product_id)?;
        let id = product.id.ok_or_else(missing_product_id)?;

        tracing::debug!(product_id = %id, "Product created");

        Ok(RemoteProduct {
            id,
            handle: product.handle.unwrap_or_default(),
            options: product
                .options
                .into_iter()
                .map(|o| RemoteOption {
                    id: o.id,
                    name: o.name,
                })
                .collect(),
        })
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Validation` if Shopify refuses the deletion.
    #[instrument(skip(self, session), fields(shop = %session.shop))]
    pub async fn delete(
        &self,
        session: &ShopSession,
        product_id: &str,
    ) -> Result<(), ProvisionError> {
        let data = self
            .api
            .execute::<ProductDelete>(
                session,
                product_delete::Variables {
                    input: product_delete::ProductDeleteInput {
                        id: product_id.to_string(),
                    },
                },
            )
            .await?;

        if let Some(payload) = data.product_delete {
            ProvisionError::check_user_errors("productDelete", payload.user_errors)?;
        }
        Ok(())
    }
}
