//! Menu management API for snack-bar staff.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use fraterno_core::ProductId;
use tracing::instrument;

use crate::catalog::{Product, ProductInput};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// List the menu in display order.
///
/// GET /api/produtos
#[instrument(skip_all)]
pub async fn list_products(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Product>> {
    Json(state.catalog().read().await.products().to_vec())
}

/// Add a product.
///
/// POST /api/produtos
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().write().await.add(input)?;
    tracing::info!(product_id = %product.id, "product added");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's name, category, price, stock and image.
///
/// PUT /api/produtos/{id}
#[instrument(skip(state, input))]
pub async fn update_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let product = state
        .catalog()
        .write()
        .await
        .update(&ProductId::new(id), input)?
        .clone();
    tracing::info!(product_id = %product.id, stock = product.stock, "product updated");
    Ok(Json(product))
}

/// Take a product off the menu.
///
/// DELETE /api/produtos/{id}
#[instrument(skip(state))]
pub async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let product = state.catalog().write().await.remove(&ProductId::new(id))?;
    tracing::info!(product_id = %product.id, "product removed");
    Ok(StatusCode::NO_CONTENT)
}
