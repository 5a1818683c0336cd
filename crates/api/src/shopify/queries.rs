//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! plus a snake_case module holding its document, `Variables` and
//! `ResponseData`. Only the fields the pipeline reads are selected, and
//! response fields that the pipeline must verify are optional so a missing
//! identifier surfaces as an integrity failure instead of a decode error.

use graphql_client::{GraphQLQuery, QueryBody};

/// Implement `GraphQLQuery` for an operation struct from its module.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

graphql_operation!(ProductCreate, product_create);
graphql_operation!(ProductDelete, product_delete);
graphql_operation!(GetProducts, get_products);
graphql_operation!(LocationAdd, location_add);
graphql_operation!(GetPrimaryLocation, get_primary_location);
graphql_operation!(ProductVariantsBulkCreate, product_variants_bulk_create);
graphql_operation!(ProductCreateMedia, product_create_media);
graphql_operation!(ProductVariantAppendMedia, product_variant_append_media);
graphql_operation!(InventoryActivate, inventory_activate);

// =============================================================================
// Products
// =============================================================================

pub mod product_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "ProductCreate";
    pub const QUERY: &str = r"mutation ProductCreate($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      id
      handle
      options {
        id
        name
        optionValues { id name }
      }
    }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub product: ProductCreateInput,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description_html: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub vendor: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub product_type: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub tags: Vec<String>,
        pub product_options: Vec<OptionCreateInput>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct OptionCreateInput {
        pub name: String,
        pub values: Vec<OptionValueCreateInput>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct OptionValueCreateInput {
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<ProductCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreatePayload {
        pub product: Option<CreatedProduct>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedProduct {
        pub id: Option<String>,
        pub handle: Option<String>,
        #[serde(default)]
        pub options: Vec<CreatedOption>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedOption {
        pub id: String,
        pub name: String,
    }
}

pub mod product_delete {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "ProductDelete";
    pub const QUERY: &str = r"mutation ProductDelete($input: ProductDeleteInput!) {
  productDelete(input: $input) {
    deletedProductId
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: ProductDeleteInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ProductDeleteInput {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_delete: Option<ProductDeletePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductDeletePayload {
        pub deleted_product_id: Option<String>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}

pub mod get_products {
    use catalog_provisioner_core::ProductStatus;
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = r"query GetProducts($first: Int!, $after: String, $query: String) {
  products(first: $first, after: $after, query: $query) {
    nodes {
      id
      title
      handle
      status
      vendor
      productType
    }
    pageInfo { hasNextPage endCursor }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductConnection {
        #[serde(default)]
        pub nodes: Vec<ProductNode>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        pub handle: String,
        #[serde(default)]
        pub status: ProductStatus,
        pub vendor: Option<String>,
        pub product_type: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        pub has_next_page: bool,
        pub end_cursor: Option<String>,
    }
}

// =============================================================================
// Locations
// =============================================================================

pub mod location_add {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "LocationAdd";
    pub const QUERY: &str = r"mutation LocationAdd($input: LocationAddInput!) {
  locationAdd(input: $input) {
    location { id name }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: LocationAddInput,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct LocationAddInput {
        pub name: String,
        pub address: LocationAddAddressInput,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LocationAddAddressInput {
        pub address1: String,
        pub city: String,
        pub province_code: String,
        pub country_code: String,
        pub zip: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub location_add: Option<LocationAddPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LocationAddPayload {
        pub location: Option<AddedLocation>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct AddedLocation {
        pub id: Option<String>,
        pub name: Option<String>,
    }
}

pub mod get_primary_location {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetPrimaryLocation";
    /// `location` without an id resolves to the shop's primary location.
    pub const QUERY: &str = r"query GetPrimaryLocation {
  location { id }
}";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub location: Option<PrimaryLocation>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct PrimaryLocation {
        pub id: Option<String>,
    }
}

// =============================================================================
// Variants
// =============================================================================

pub mod product_variants_bulk_create {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkCreate";
    pub const QUERY: &str = r"mutation ProductVariantsBulkCreate(
  $productId: ID!
  $variants: [ProductVariantsBulkInput!]!
  $strategy: ProductVariantsBulkCreateStrategy
) {
  productVariantsBulkCreate(productId: $productId, variants: $variants, strategy: $strategy) {
    productVariants {
      id
      sku
      inventoryItem { id }
    }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<VariantInput>,
        pub strategy: Option<BulkCreateStrategy>,
    }

    /// How bulk creation treats the standalone variant made with the product.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum BulkCreateStrategy {
        Default,
        RemoveStandaloneVariant,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantInput {
        pub price: Decimal,
        pub inventory_item: InventoryItemInput,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub inventory_quantities: Vec<InventoryLevelInput>,
        pub option_values: Vec<VariantOptionValueInput>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct InventoryItemInput {
        pub sku: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryLevelInput {
        pub available_quantity: i64,
        pub location_id: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantOptionValueInput {
        pub name: String,
        pub option_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_create: Option<BulkCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BulkCreatePayload {
        #[serde(default)]
        pub product_variants: Option<Vec<CreatedVariant>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreatedVariant {
        pub id: String,
        pub sku: Option<String>,
        pub inventory_item: Option<InventoryItemRef>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct InventoryItemRef {
        pub id: String,
    }
}

// =============================================================================
// Media
// =============================================================================

pub mod product_create_media {
    use catalog_provisioner_core::MediaStatus;
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "ProductCreateMedia";
    pub const QUERY: &str = r"mutation ProductCreateMedia(
  $productId: ID!
  $media: [CreateMediaInput!]!
) {
  productCreateMedia(productId: $productId, media: $media) {
    media { id alt status }
    mediaUserErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub media: Vec<CreateMediaInput>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MediaContentType {
        Image,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateMediaInput {
        pub media_content_type: MediaContentType,
        pub original_source: String,
        pub alt: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create_media: Option<CreateMediaPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateMediaPayload {
        #[serde(default)]
        pub media: Option<Vec<CreatedMedia>>,
        #[serde(default)]
        pub media_user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedMedia {
        pub id: Option<String>,
        pub alt: Option<String>,
        #[serde(default)]
        pub status: MediaStatus,
    }
}

pub mod product_variant_append_media {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "ProductVariantAppendMedia";
    pub const QUERY: &str = r"mutation ProductVariantAppendMedia(
  $productId: ID!
  $variantMedia: [ProductVariantAppendMediaInput!]!
) {
  productVariantAppendMedia(productId: $productId, variantMedia: $variantMedia) {
    productVariants { id }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variant_media: Vec<VariantMediaInput>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantMediaInput {
        pub variant_id: String,
        pub media_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variant_append_media: Option<AppendMediaPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppendMediaPayload {
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }
}

// =============================================================================
// Inventory
// =============================================================================

pub mod inventory_activate {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "InventoryActivate";
    pub const QUERY: &str = r"mutation InventoryActivate(
  $inventoryItemId: ID!
  $locationId: ID!
  $available: Int
) {
  inventoryActivate(
    inventoryItemId: $inventoryItemId
    locationId: $locationId
    available: $available
  ) {
    inventoryLevel { id }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub inventory_item_id: String,
        pub location_id: String,
        pub available: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub inventory_activate: Option<InventoryActivatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InventoryActivatePayload {
        pub inventory_level: Option<ActivatedLevel>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ActivatedLevel {
        pub id: String,
    }
}
