//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::config::{SnackBarConfig, StorefrontConfig};
use crate::orders::OrderBook;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Writers that touch both the
/// catalog and the order book lock the catalog first. The snack-bar settings
/// start from the configuration and are changed by staff at runtime.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    snack_bar: RwLock<SnackBarConfig>,
    catalog: RwLock<Catalog>,
    orders: RwLock<OrderBook>,
}

impl AppState {
    /// Create a new application state with an empty order book.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                snack_bar: RwLock::new(config.snack_bar.clone()),
                config,
                catalog: RwLock::new(catalog),
                orders: RwLock::new(OrderBook::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Live snack-bar status and notice.
    #[must_use]
    pub fn snack_bar(&self) -> &RwLock<SnackBarConfig> {
        &self.inner.snack_bar
    }

    /// The product catalog.
    #[must_use]
    pub fn catalog(&self) -> &RwLock<Catalog> {
        &self.inner.catalog
    }

    /// Customers and orders.
    #[must_use]
    pub fn orders(&self) -> &RwLock<OrderBook> {
        &self.inner.orders
    }
}
