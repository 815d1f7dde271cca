//! Product category filter on the snack-bar page.

use crate::dom::{Display, Document, NodeId};

pub const CONTAINER_CLASS: &str = "category-filters";
pub const BUTTON_CLASS: &str = "filter-btn";
pub const CARD_CLASS: &str = "product-card";
pub const ACTIVE_CLASS: &str = "active";

/// Tokens that select every card. The page labels the button "todos".
const WILDCARDS: [&str; 2] = ["all", "todos"];

/// The category currently selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterSelection {
    #[default]
    All,
    /// Lowercased category token.
    Category(String),
}

impl FilterSelection {
    /// Interpret a `data-category` token.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        if WILDCARDS.contains(&token.as_str()) {
            Self::All
        } else {
            Self::Category(token)
        }
    }

    /// Whether a card tagged `category` is shown under this selection.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(selected) => category.trim().to_lowercase() == *selected,
        }
    }
}

/// Exclusive filter buttons over the product cards.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    buttons: Vec<NodeId>,
    cards: Vec<NodeId>,
    selection: FilterSelection,
}

impl CategoryFilter {
    pub const NAME: &'static str = "category-filter";

    /// Returns `None` if the page has no `.category-filters` container.
    #[must_use]
    pub fn mount(doc: &Document) -> Option<Self> {
        doc.by_class(CONTAINER_CLASS).first()?;
        Some(Self {
            buttons: doc.by_class(BUTTON_CLASS),
            cards: doc.by_class(CARD_CLASS),
            selection: FilterSelection::All,
        })
    }

    /// Handle a click. Returns `true` if it landed on a filter button.
    pub fn on_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some(button) = doc
            .closest_with_class(target, BUTTON_CLASS)
            .filter(|button| self.buttons.contains(button))
        else {
            return false;
        };
        self.activate(doc, button);
        true
    }

    /// Make `button` the only active control and apply its category.
    pub fn activate(&mut self, doc: &mut Document, button: NodeId) {
        for &other in &self.buttons {
            doc.remove_class(other, ACTIVE_CLASS);
        }
        doc.add_class(button, ACTIVE_CLASS);

        let token = doc.data(button, "category").unwrap_or_default();
        self.selection = FilterSelection::from_token(token);
        tracing::debug!(selection = ?self.selection, "category filter applied");

        for &card in &self.cards {
            let category = doc.data(card, "category").unwrap_or_default();
            let display = if self.selection.matches(category) {
                Display::Flex
            } else {
                Display::None
            };
            doc.set_display(card, display);
        }
    }

    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }
}
