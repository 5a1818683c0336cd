//! Product provisioning pipeline.
//!
//! # Stages
//!
//! Stages run strictly in sequence, each consuming the previous stage's
//! output:
//!
//! 1. [`ProductCreator`] - product plus option schema
//! 2. [`LocationResolver`] - per-shop fulfillment location (bulk strategy only)
//! 3. [`OptionIndex`] - value to option-id lookup
//! 4. [`VariantProvisioner`] - one bulk variant mutation
//! 5. [`InventorySetter`] - per-variant stock activation (activate strategy only)
//! 6. [`MediaAttacher`] - product media
//! 7. [`VariantMediaLinker`] - media back onto variants
//!
//! Any failure aborts the remaining stages. A product that was created before
//! the failure is left in place or deleted according to [`FailurePolicy`].
//!
//! # Positional contracts
//!
//! Media is paired with variants by position: the n-th variant declaring an
//! image receives the n-th attached media item. Variant option values are
//! owned by the first declared option whose value set contains them.

mod inventory;
mod listing;
mod location;
mod media;
mod options;
mod product;
mod variants;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use catalog_provisioner_core::ProductSubmission;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::LocationProfile;
use crate::db::LocationStore;
use crate::shopify::{
    CatalogApi, MediaLink, ProvisionError, RemoteMedia, RemoteOption, RemoteProduct,
    RemoteVariant, ShopSession,
};

pub use inventory::{InventoryActivation, InventorySetter};
pub use listing::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ProductLister, ProductQuery};
pub use location::LocationResolver;
pub use media::{MediaAttacher, VariantMediaLinker, media_requests, pair_variant_media};
pub use options::{OptionIndex, PLACEHOLDER_OPTION_VALUE};
pub use product::{ProductCreator, build_product_input, build_product_options};
pub use variants::{VariantProvisioner, build_variant_inputs};

// =============================================================================
// Settings
// =============================================================================

/// An unrecognized setting value.
#[derive(Debug, Error)]
#[error("unknown {setting} {value:?}, expected one of: {expected}")]
pub struct UnknownSetting {
    setting: &'static str,
    value: String,
    expected: &'static str,
}

/// How starting stock is assigned to new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStrategy {
    /// Quantities travel inside the bulk variant mutation, bound to the
    /// shop's provisioned location.
    #[default]
    Bulk,
    /// Quantities are applied afterwards with one activation per variant at
    /// the shop's primary location.
    Activate,
}

impl FromStr for InventoryStrategy {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bulk" => Ok(Self::Bulk),
            "activate" => Ok(Self::Activate),
            _ => Err(UnknownSetting {
                setting: "inventory strategy",
                value: s.to_string(),
                expected: "bulk, activate",
            }),
        }
    }
}

impl fmt::Display for InventoryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bulk => write!(f, "bulk"),
            Self::Activate => write!(f, "activate"),
        }
    }
}

/// What happens to a created product when a later stage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the partial product for manual cleanup.
    #[default]
    Retain,
    /// Issue one `productDelete` for the partial product.
    Delete,
}

impl FromStr for FailurePolicy {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "delete" => Ok(Self::Delete),
            _ => Err(UnknownSetting {
                setting: "failure policy",
                value: s.to_string(),
                expected: "retain, delete",
            }),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Pipeline behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSettings {
    pub inventory: InventoryStrategy,
    pub on_failure: FailurePolicy,
}

// =============================================================================
// Result
// =============================================================================

/// Everything the pipeline created for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedProduct {
    pub product_id: String,
    pub handle: String,
    pub options: Vec<RemoteOption>,
    /// Created variants keyed by SKU.
    pub variants: BTreeMap<String, RemoteVariant>,
    /// Attached media in submission order.
    pub media: Vec<RemoteMedia>,
    pub media_links: Vec<MediaLink>,
    /// Location that received starting stock, if any stock was assigned.
    pub location_id: Option<String>,
    pub inventory_set: bool,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Drives every stage for one submission against one shop.
pub struct Pipeline<'a, A, S> {
    api: &'a A,
    locations: &'a S,
    profile: &'a LocationProfile,
    settings: PipelineSettings,
}

impl<'a, A, S> Pipeline<'a, A, S>
where
    A: CatalogApi,
    S: LocationStore,
{
    #[must_use]
    pub const fn new(
        api: &'a A,
        locations: &'a S,
        profile: &'a LocationProfile,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            api,
            locations,
            profile,
            settings,
        }
    }

    /// Provision `submission` as a new product.
    ///
    /// # Errors
    ///
    /// Returns the first `ProvisionError` raised by any stage. Under
    /// [`FailurePolicy::Delete`] the partially created product is deleted
    /// before the error is returned.
    #[instrument(
        skip_all,
        fields(
            shop = %session.shop,
            title = %submission.title,
            variants = submission.variants.len(),
            strategy = %self.settings.inventory,
        )
    )]
    pub async fn run(
        &self,
        session: &ShopSession,
        submission: &ProductSubmission,
    ) -> Result<ProvisionedProduct, ProvisionError> {
        let product = ProductCreator::new(self.api)
            .create(session, submission)
            .await?;

        match self.populate(session, submission, &product).await {
            Ok(provisioned) => {
                tracing::info!(
                    product_id = %provisioned.product_id,
                    variants = provisioned.variants.len(),
                    media_links = provisioned.media_links.len(),
                    "Product provisioned"
                );
                Ok(provisioned)
            }
            Err(err) => {
                match self.settings.on_failure {
                    FailurePolicy::Delete => self.compensate(session, &product.id).await,
                    FailurePolicy::Retain => tracing::warn!(
                        product_id = %product.id,
                        error = %err,
                        "Provisioning failed, partial product retained"
                    ),
                }
                Err(err)
            }
        }
    }

    async fn populate(
        &self,
        session: &ShopSession,
        submission: &ProductSubmission,
        product: &RemoteProduct,
    ) -> Result<ProvisionedProduct, ProvisionError> {
        let bulk_location = match self.settings.inventory {
            InventoryStrategy::Bulk => Some(
                LocationResolver::new(self.api, self.locations, self.profile)
                    .resolve(session)
                    .await?,
            ),
            InventoryStrategy::Activate => None,
        };

        let index = OptionIndex::build(submission, product);
        let variants = VariantProvisioner::new(self.api)
            .create(
                session,
                &product.id,
                submission,
                &index,
                bulk_location.as_deref(),
            )
            .await?;

        let (location_id, inventory_set) = match self.settings.inventory {
            InventoryStrategy::Bulk => {
                let stocked = submission
                    .variants
                    .iter()
                    .any(|v| v.inventory_quantity.is_some());
                if stocked {
                    (bulk_location, true)
                } else {
                    (None, false)
                }
            }
            InventoryStrategy::Activate => {
                let activation = InventorySetter::new(self.api)
                    .apply(session, submission, &variants)
                    .await?;
                (activation.location_id, activation.applied)
            }
        };

        let media = MediaAttacher::new(self.api)
            .attach(session, &product.id, submission)
            .await?;
        let media_links = VariantMediaLinker::new(self.api)
            .link(session, &product.id, submission, &variants, &media)
            .await?;

        Ok(ProvisionedProduct {
            product_id: product.id.clone(),
            handle: product.handle.clone(),
            options: product.options.clone(),
            variants,
            media,
            media_links,
            location_id,
            inventory_set,
        })
    }

    async fn compensate(&self, session: &ShopSession, product_id: &str) {
        match ProductCreator::new(self.api).delete(session, product_id).await {
            Ok(()) => tracing::info!(product_id, "Deleted partially provisioned product"),
            Err(e) => tracing::error!(
                product_id,
                error = %e,
                "Failed to delete partially provisioned product"
            ),
        }
    }
}
