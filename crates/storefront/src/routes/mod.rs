//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Health check
//! GET    /lanchonete               - Snack-bar menu with the cart
//! POST   /finalizar-pedido         - Checkout (JSON)
//!
//! # Order board (requires x-admin-token)
//! GET    /api/pedidos              - All orders, oldest first
//! POST   /api/pedidos/{id}/status  - Move an order to a new status
//! DELETE /api/pedidos/{id}         - Delete an order
//!
//! # Menu and snack-bar settings (requires x-admin-token)
//! GET    /api/produtos             - All products
//! POST   /api/produtos             - Add a product
//! PUT    /api/produtos/{id}        - Edit a product
//! DELETE /api/produtos/{id}        - Remove a product
//! GET    /api/lanchonete           - Status and notice
//! POST   /api/lanchonete/status    - Open or close the snack bar
//! POST   /api/lanchonete/aviso     - Set or clear the notice
//! ```

pub mod admin;
pub mod orders;
pub mod products;
pub mod settings;
pub mod snack_bar;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use fraterno_core::order::ORDER_PATH;

use crate::state::AppState;

/// Create the staff API router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/pedidos", get(admin::list_orders))
        .route("/pedidos/{id}", delete(admin::delete_order))
        .route("/pedidos/{id}/status", post(admin::update_status))
        .route(
            "/produtos",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/produtos/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/lanchonete", get(settings::show))
        .route("/lanchonete/status", post(settings::change_status))
        .route("/lanchonete/aviso", post(settings::change_notice))
}

/// Create all page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lanchonete", get(snack_bar::page))
        .route(ORDER_PATH, post(orders::place_order))
        .nest("/api", admin_routes())
}
