//! Checkout endpoint.

use axum::{Json, extract::State};
use fraterno_core::{OrderReceipt, OrderRequest};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Place an order from the cart widget.
///
/// POST /finalizar-pedido
#[instrument(skip(state, order), fields(items = order.cart.len()))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(order): Json<OrderRequest>,
) -> Result<Json<OrderReceipt>> {
    let placed = {
        let mut catalog = state.catalog().write().await;
        let mut orders = state.orders().write().await;
        orders.place(&mut catalog, &order)?
    };

    tracing::info!(
        order_id = %placed.id,
        customer_id = %placed.customer_id,
        total = %placed.total,
        lines = placed.lines.len(),
        "order placed"
    );
    add_breadcrumb(
        "order",
        "Order placed",
        Some(&[("order_id", &placed.id.to_string())]),
    );

    Ok(Json(OrderReceipt::accepted()))
}
