//! Product provisioning and listing handlers.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::post,
};
use catalog_provisioner_core::ProductSubmission;
use serde::Serialize;

use crate::db::LocationRepository;
use crate::error::AppError;
use crate::middleware::RequireShop;
use crate::pipeline::{Pipeline, ProductLister, ProductQuery, ProvisionedProduct};
use crate::shopify::ProductSummary;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/shopify/products", post(create_product).get(list_products))
}

/// Response for a provisioned product.
#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub success: bool,
    pub message: &'static str,
    pub product_id: String,
    pub handle: String,
    pub product: ProvisionedProduct,
}

/// Response for a product listing page.
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub success: bool,
    pub products: Vec<ProductSummary>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Provision a product in the requesting shop.
///
/// # Errors
///
/// Returns `AppError` if the headers or body are unusable or any pipeline
/// stage fails.
pub async fn create_product(
    State(state): State<AppState>,
    RequireShop(session): RequireShop,
    payload: Result<Json<ProductSubmission>, JsonRejection>,
) -> Result<Json<CreateProductResponse>, AppError> {
    let Json(submission) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;

    let config = state.config();
    let locations = LocationRepository::new(state.pool());
    let product = Pipeline::new(
        state.transport(),
        &locations,
        &config.location,
        config.pipeline,
    )
    .run(&session, &submission)
    .await?;

    Ok(Json(CreateProductResponse {
        success: true,
        message: "Product created successfully.",
        product_id: product.product_id.clone(),
        handle: product.handle.clone(),
        product,
    }))
}

/// List products in the requesting shop.
///
/// # Errors
///
/// Returns `AppError` if the headers or query string are unusable or the
/// remote call fails.
pub async fn list_products(
    State(state): State<AppState>,
    RequireShop(session): RequireShop,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ListProductsResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::InvalidQuery(e.body_text()))?;

    let page = ProductLister::new(state.transport())
        .list(&session, &query)
        .await?;

    Ok(Json(ListProductsResponse {
        success: true,
        products: page.products,
        has_next_page: page.has_next_page,
        end_cursor: page.end_cursor,
    }))
}
