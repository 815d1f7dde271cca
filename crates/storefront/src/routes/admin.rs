//! Order board API for snack-bar staff.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use fraterno_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::orders::Order;
use crate::state::AppState;

/// Body of a status change.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// List every order, oldest first.
///
/// GET /api/pedidos
#[instrument(skip_all)]
pub async fn list_orders(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.orders().read().await.orders().to_vec())
}

/// Move an order to `Em Produção`, `Disponível para Retirada` or `Concluído`.
///
/// POST /api/pedidos/{id}/status
#[instrument(skip(state, update), fields(status = %update.status))]
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let status = update
        .status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;

    let order = state
        .orders()
        .write()
        .await
        .set_status(OrderId::new(id), status)?
        .clone();

    tracing::info!(order_id = %order.id, status = %order.status, "order status changed");
    Ok(Json(order))
}

/// Delete an order.
///
/// DELETE /api/pedidos/{id}
#[instrument(skip(state))]
pub async fn delete_order(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let order = state.orders().write().await.delete(OrderId::new(id))?;
    tracing::info!(order_id = %order.id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}
