//! Integration tests for the Fraterno Amor site.
//!
//! Each test starts its own storefront on an ephemeral port and drives the
//! page widgets against it over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fraterno-integration-tests
//! ```

use std::net::SocketAddr;

use fraterno_core::Price;
use fraterno_storefront::catalog::Catalog;
use fraterno_storefront::config::StorefrontConfig;
use fraterno_storefront::state::AppState;
use fraterno_widgets::dom::{Document, Element, NodeId};
use fraterno_widgets::widgets::cart;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A storefront running in the background of the current test runtime.
pub struct TestStorefront {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl TestStorefront {
    /// Bind to `127.0.0.1:0` and serve the full router.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(config: StorefrontConfig, catalog: Catalog) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = AppState::new(config, catalog);
        let app = fraterno_storefront::app(state.clone());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestStorefront {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Anchors of a snack-bar page built by [`snack_bar_page`].
pub struct SnackBarPage {
    pub document: Document,
    /// "Pedir" buttons, in catalog order.
    pub triggers: Vec<NodeId>,
    pub checkout: NodeId,
    pub form: NodeId,
    pub name_input: NodeId,
    pub total: NodeId,
}

/// Build the snack-bar page markup for `catalog`, as the storefront renders
/// it.
#[must_use]
pub fn snack_bar_page(catalog: &Catalog) -> SnackBarPage {
    let mut doc = Document::new();
    let body = doc.body();

    let grid = doc.append(body, Element::new("div").with_class("product-grid"));
    let triggers = catalog
        .products()
        .iter()
        .map(|product| {
            let card = doc.append(
                grid,
                Element::new("div")
                    .with_class("product-card")
                    .with_data("category", &product.category.to_lowercase()),
            );
            doc.append(card, Element::new("h3").with_text(&product.name));
            doc.append(
                card,
                Element::new("button")
                    .with_class(cart::TRIGGER_CLASS)
                    .with_data("produto-id", product.id.as_str())
                    .with_data("produto-nome", &product.name)
                    .with_data("produto-preco", &plain(product.price)),
            )
        })
        .collect();

    let sidebar = doc.append(body, Element::new("aside").with_id(cart::SIDEBAR_ID));
    doc.append(sidebar, Element::new("ul").with_id(cart::LIST_ID));
    let total = doc.append(sidebar, Element::new("span").with_id(cart::TOTAL_ID));
    let checkout = doc.append(
        sidebar,
        Element::new("button").with_id(cart::CHECKOUT_BUTTON_ID),
    );

    let modal = doc.append(body, Element::new("div").with_id(cart::MODAL_ID));
    doc.append(
        modal,
        Element::new("span").with_class(cart::CLOSE_BUTTON_CLASS),
    );
    let form = doc.append(modal, Element::new("form").with_id(cart::FORM_ID));
    let name_input = doc.append(
        form,
        Element::new("input").with_id(cart::NAME_INPUT_ID),
    );

    SnackBarPage {
        document: doc,
        triggers,
        checkout,
        form,
        name_input,
        total,
    }
}

fn plain(price: Price) -> String {
    format!("{:.2}", price.amount())
}
