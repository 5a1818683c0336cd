//! Domain types for remote catalog entities.
//!
//! These are the identifiers the pipeline carries between stages, separate
//! from the raw per-operation response shapes in [`super::queries`].

use catalog_provisioner_core::{MediaStatus, ProductStatus};
use serde::{Deserialize, Serialize};

// =============================================================================
// Product Types
// =============================================================================

/// An option as created on the remote product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOption {
    pub id: String,
    pub name: String,
}

/// A freshly created product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProduct {
    /// Shopify global ID (`gid://shopify/Product/...`).
    pub id: String,
    pub handle: String,
    pub options: Vec<RemoteOption>,
}

/// A variant returned by bulk creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVariant {
    pub id: String,
    pub sku: String,
    /// Inventory item backing this variant, used for stock activation.
    pub inventory_item_id: Option<String>,
}

// =============================================================================
// Media Types
// =============================================================================

/// A media item attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMedia {
    /// Absent when Shopify accepted the entry without assigning an ID yet.
    pub id: Option<String>,
    pub alt: Option<String>,
    pub status: MediaStatus,
}

/// A variant-to-media association performed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    pub sku: String,
    pub variant_id: String,
    pub media_id: String,
}

// =============================================================================
// Listing Types
// =============================================================================

/// Summary row for product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: ProductStatus,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
}
