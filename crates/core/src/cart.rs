//! Shopping cart model.
//!
//! A cart is an ordered list of distinct line items. Adding a product that is
//! already present bumps its quantity instead of appending a second line, so
//! insertion order is also display order. Items are never removed one by
//! one; the whole cart is cleared after a successful checkout.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One distinct product in the cart with its aggregated quantity.
///
/// Field names on the wire follow the checkout endpoint (`nome`, `preco`,
/// `quantidade`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub unit_price: Price,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

impl CartItem {
    /// `unit_price × quantity`, saturating on overflow.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    /// `unit_price × quantity`, or `None` on overflow.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Ordered collection of [`CartItem`]s, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// If `id` is already in the cart its quantity is incremented and the
    /// stored name and price are kept; otherwise a new line with quantity 1
    /// is appended. Returns the resulting quantity for `id`.
    pub fn add(&mut self, id: ProductId, name: impl Into<String>, unit_price: Price) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }

        self.items.push(CartItem {
            id,
            name: name.into(),
            unit_price,
            quantity: 1,
        });
        1
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every line total, saturating on overflow.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of every line total, or `None` if any step overflows.
    #[must_use]
    pub fn checked_total(&self) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |acc, item| acc.checked_add(item.checked_line_total()?))
    }

    /// Quantity of `id`, or 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| &item.id == id)
            .map_or(0, |item| item.quantity)
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Where the cart widget is in its checkout cycle.
///
/// ```text
/// Empty --add--> Populated --checkout--> Finalizing --submitted--> Empty
///                    ^                        |
///                    +-------close modal------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CartState {
    #[default]
    Empty,
    Populated,
    /// The name prompt is open.
    Finalizing,
}

impl CartState {
    /// State after an item was added. An open prompt stays open.
    #[must_use]
    pub const fn on_item_added(self) -> Self {
        match self {
            Self::Empty => Self::Populated,
            other => other,
        }
    }

    /// State after the checkout button was pressed, or `None` if there is
    /// nothing to check out.
    #[must_use]
    pub const fn on_checkout_opened(self) -> Option<Self> {
        match self {
            Self::Empty => None,
            Self::Populated | Self::Finalizing => Some(Self::Finalizing),
        }
    }

    /// State after the name prompt was dismissed without submitting.
    #[must_use]
    pub const fn on_prompt_closed(self) -> Self {
        match self {
            Self::Finalizing => Self::Populated,
            other => other,
        }
    }

    /// State after the order was accepted by the server.
    #[must_use]
    pub const fn on_order_submitted(self) -> Self {
        Self::Empty
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::parse(s).unwrap()
    }

    #[test]
    fn test_adding_same_id_twice_bumps_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(ProductId::from("1"), "Burger", price("12.50")), 1);
        assert_eq!(cart.add(ProductId::from("1"), "Burger", price("12.50")), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_repeat_add_keeps_first_name_and_price() {
        let mut cart = Cart::new();
        cart.add(ProductId::from("1"), "Burger", price("12.50"));
        cart.add(ProductId::from("1"), "Renamed", price("99"));

        let item = &cart.items()[0];
        assert_eq!(item.name, "Burger");
        assert_eq!(item.unit_price, price("12.50"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        cart.add(ProductId::from("2"), "Soda", price("5"));
        cart.add(ProductId::from("1"), "Burger", price("12.50"));
        cart.add(ProductId::from("2"), "Soda", price("5"));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let mut cart = Cart::new();
        cart.add(ProductId::from("1"), "Burger", price("12.50"));
        cart.add(ProductId::from("1"), "Burger", price("12.50"));
        cart.add(ProductId::from("2"), "Soda", price("5.00"));

        assert_eq!(cart.total().display(), "R$ 30.00");
        assert_eq!(cart.quantity_of(&ProductId::from("1")), 2);
        assert_eq!(cart.quantity_of(&ProductId::from("9")), 0);
    }

    #[test]
    fn test_checked_total_detects_overflow() {
        let mut cart = Cart::new();
        cart.add(ProductId::from("1"), "Burger", price("70000000000000000000000000000"));
        assert!(cart.checked_total().is_some());

        cart.add(ProductId::from("1"), "Burger", price("1"));
        assert_eq!(cart.checked_total(), None);
        assert_eq!(cart.total(), Price::new(rust_decimal::Decimal::MAX).unwrap());
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(ProductId::from("1"), "Burger", price("1"));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_wire_format() {
        let mut cart = Cart::new();
        cart.add(ProductId::from("1"), "Burger", price("12.5"));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[0]["id"], "1");
        assert_eq!(json[0]["nome"], "Burger");
        assert_eq!(json[0]["preco"], serde_json::json!(12.5));
        assert_eq!(json[0]["quantidade"], 1);
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(CartState::Empty.on_item_added(), CartState::Populated);
        assert_eq!(CartState::Finalizing.on_item_added(), CartState::Finalizing);
        assert_eq!(CartState::Empty.on_checkout_opened(), None);
        assert_eq!(
            CartState::Populated.on_checkout_opened(),
            Some(CartState::Finalizing)
        );
        assert_eq!(CartState::Finalizing.on_prompt_closed(), CartState::Populated);
        assert_eq!(CartState::Populated.on_prompt_closed(), CartState::Populated);
        assert_eq!(CartState::Finalizing.on_order_submitted(), CartState::Empty);
    }
}
