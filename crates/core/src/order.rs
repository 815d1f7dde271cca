//! Checkout payload and the WhatsApp hand-off message.

use core::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{CustomerName, Price};

/// Path the cart posts orders to.
pub const ORDER_PATH: &str = "/finalizar-pedido";

/// Number that receives order messages.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "5583998000756";

/// Body of `POST /finalizar-pedido`.
///
/// ```json
/// { "nome_cliente": "Maria", "carrinho": [ { "id": "1", "nome": "Burger", "preco": 12.5, "quantidade": 2 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "nome_cliente")]
    pub customer_name: String,
    #[serde(rename = "carrinho")]
    pub cart: Cart,
}

impl OrderRequest {
    #[must_use]
    pub fn new(customer_name: &CustomerName, cart: &Cart) -> Self {
        Self {
            customer_name: customer_name.as_str().to_owned(),
            cart: cart.clone(),
        }
    }
}

/// Body the server answers an accepted order with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub message: String,
}

impl OrderReceipt {
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            message: "Pedido recebido com sucesso!".to_owned(),
        }
    }
}

/// Human-readable order summary sent to the snack bar over WhatsApp.
///
/// ```text
/// Olá! Meu nome é Maria e gostaria de fazer o seguinte pedido:
///
/// 2x - Burger
/// 1x - Soda
///
/// Total: R$ 30.00
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    text: String,
    total: Price,
}

impl OrderSummary {
    #[must_use]
    pub fn new(customer_name: &CustomerName, cart: &Cart) -> Self {
        let mut text = format!(
            "Olá! Meu nome é {customer_name} e gostaria de fazer o seguinte pedido:\n\n"
        );
        for item in cart.items() {
            let _ = writeln!(text, "{}x - {}", item.quantity, item.name);
        }
        let total = cart.total();
        let _ = write!(text, "\nTotal: {total}");

        Self { text, total }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// `https://wa.me/<number>?text=<encoded summary>`.
    #[must_use]
    pub fn whatsapp_url(&self, number: &str) -> String {
        format!(
            "https://wa.me/{number}?text={}",
            urlencoding::encode(&self.text)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        let burger = Price::parse("12.50").unwrap();
        cart.add(ProductId::from("1"), "Burger", burger);
        cart.add(ProductId::from("1"), "Burger", burger);
        cart.add(ProductId::from("2"), "Soda", Price::parse("5.00").unwrap());
        cart
    }

    #[test]
    fn test_summary_lists_lines_and_total() {
        let name = CustomerName::parse("Maria").unwrap();
        let summary = OrderSummary::new(&name, &sample_cart());

        let lines: Vec<&str> = summary.text().lines().collect();
        assert!(lines[0].contains("Maria"));
        assert!(lines.contains(&"2x - Burger"));
        assert!(lines.contains(&"1x - Soda"));
        assert_eq!(lines.last(), Some(&"Total: R$ 30.00"));
        assert_eq!(summary.total().display(), "R$ 30.00");
    }

    #[test]
    fn test_whatsapp_url_encodes_message() {
        let name = CustomerName::parse("Ana Paula").unwrap();
        let summary = OrderSummary::new(&name, &sample_cart());
        let url = summary.whatsapp_url(DEFAULT_WHATSAPP_NUMBER);

        assert!(url.starts_with("https://wa.me/5583998000756?text="));
        assert!(url.contains("Ana%20Paula"));
        assert!(url.contains("%0A"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_request_wire_names() {
        let name = CustomerName::parse("Maria").unwrap();
        let json = serde_json::to_value(OrderRequest::new(&name, &sample_cart())).unwrap();

        assert_eq!(json["nome_cliente"], "Maria");
        assert_eq!(json["carrinho"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["carrinho"][0]["quantidade"], 2);
    }

    #[test]
    fn test_request_parses_browser_payload() {
        let body = r#"{"nome_cliente":"Zé","carrinho":[{"id":"3","nome":"Pastel","preco":6,"quantidade":3}]}"#;
        let request: OrderRequest = serde_json::from_str(body).unwrap();

        assert_eq!(request.customer_name, "Zé");
        assert_eq!(request.cart.total().display(), "R$ 18.00");
    }
}
