//! Snack-bar page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::catalog::Product;
use crate::state::AppState;

/// A product as rendered on a menu card.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    /// Lowercased category token for the filter.
    pub category: String,
    /// Plain decimal for `data-produto-preco`.
    pub price_value: String,
    pub price_display: String,
    pub image_url: Option<String>,
    pub available: bool,
}

impl ProductView {
    fn new(product: &Product, open: bool) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.to_lowercase(),
            price_value: format!("{:.2}", product.price.amount()),
            price_display: product.price.display(),
            image_url: product.image_url.clone(),
            available: open && product.in_stock(),
        }
    }
}

/// A category filter button.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub token: String,
    pub label: String,
}

/// Snack-bar page template.
#[derive(Template, WebTemplate)]
#[template(path = "lanchonete.html")]
pub struct SnackBarTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryView>,
    pub open: bool,
    pub notice: Option<String>,
    pub whatsapp_number: String,
}

/// Render the menu, cart sidebar and checkout prompt.
///
/// GET /lanchonete
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>) -> SnackBarTemplate {
    let snack_bar = state.snack_bar().read().await.clone();
    let open = snack_bar.status.is_open();
    let catalog = state.catalog().read().await;

    SnackBarTemplate {
        products: catalog
            .products()
            .iter()
            .map(|p| ProductView::new(p, open))
            .collect(),
        categories: catalog
            .categories()
            .into_iter()
            .map(|label| CategoryView {
                token: label.to_lowercase(),
                label: label.to_owned(),
            })
            .collect(),
        open,
        notice: snack_bar.notice,
        whatsapp_number: state.config().whatsapp_number.clone(),
    }
}
