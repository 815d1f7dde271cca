//! Order book: customers and the orders they placed.
//!
//! Customers are matched by exact name and created on their first order.
//! Placing an order records its total as submitted and then, for every cart
//! line the catalog can serve, an order line at the catalog price.

use chrono::{DateTime, Utc};
use fraterno_core::{
    CustomerId, CustomerName, CustomerNameError, OrderId, OrderRequest, OrderStatus, Price,
    ProductId,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid customer name: {0}")]
    InvalidName(#[from] CustomerNameError),

    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid cart item {id}: {reason}")]
    InvalidItem { id: ProductId, reason: String },

    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("status \"{0}\" cannot be set by hand")]
    StatusNotAssignable(OrderStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(rename = "nome")]
    pub name: String,
}

/// One product line the kitchen has to prepare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    #[serde(rename = "produto_id")]
    pub product_id: ProductId,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "preco_unitario")]
    pub unit_price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[serde(rename = "nome_cliente")]
    pub customer_name: String,
    #[serde(rename = "data_pedido")]
    pub placed_at: DateTime<Utc>,
    /// Total as submitted by the customer's cart.
    #[serde(rename = "valor_total")]
    pub total: Price,
    pub status: OrderStatus,
    #[serde(rename = "itens")]
    pub lines: Vec<OrderLine>,
}

/// In-memory store of customers and orders.
#[derive(Debug, Default)]
pub struct OrderBook {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    last_customer_id: i32,
    last_order_id: i32,
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record an order, taking stock from `catalog`.
    ///
    /// Cart lines whose product is unknown or short on stock are left out of
    /// the order lines; the order itself is still created.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or too long, the cart is empty,
    /// a line has zero quantity or a negative price, or the total does not
    /// fit in a [`Price`]. Nothing is recorded and no stock is taken in that
    /// case.
    pub fn place(
        &mut self,
        catalog: &mut Catalog,
        request: &OrderRequest,
    ) -> Result<Order, OrderError> {
        let name = CustomerName::parse(&request.customer_name)?;
        if request.cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        let mut total = Price::ZERO;
        for item in request.cart.items() {
            let invalid = |reason: String| OrderError::InvalidItem {
                id: item.id.clone(),
                reason,
            };
            if item.quantity == 0 {
                return Err(invalid("quantity must be at least 1".into()));
            }
            Price::new(item.unit_price.amount()).map_err(|e| invalid(e.to_string()))?;
            total = item
                .checked_line_total()
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| invalid("order total is too large".into()))?;
        }

        let customer_id = self.find_or_create_customer(&name);

        let mut lines = Vec::with_capacity(request.cart.len());
        for item in request.cart.items() {
            match catalog.reserve(&item.id, item.quantity) {
                Some(unit_price) => lines.push(OrderLine {
                    product_id: item.id.clone(),
                    quantity: item.quantity,
                    unit_price,
                }),
                None => tracing::warn!(
                    product_id = %item.id,
                    quantity = item.quantity,
                    "unknown product or insufficient stock, line skipped"
                ),
            }
        }

        self.last_order_id += 1;
        let order = Order {
            id: OrderId::new(self.last_order_id),
            customer_id,
            customer_name: name.into_inner(),
            placed_at: Utc::now(),
            total,
            status: OrderStatus::Received,
            lines,
        };
        self.orders.push(order.clone());
        Ok(order)
    }

    /// Look up a customer by exact name, creating one if needed.
    pub fn find_or_create_customer(&mut self, name: &CustomerName) -> CustomerId {
        if let Some(customer) = self.customers.iter().find(|c| c.name == name.as_str()) {
            return customer.id;
        }
        self.last_customer_id += 1;
        let id = CustomerId::new(self.last_customer_id);
        self.customers.push(Customer {
            id,
            name: name.as_str().to_owned(),
        });
        tracing::debug!(customer_id = %id, "customer created");
        id
    }

    /// Orders in the order they were placed.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Move an order to a staff-assignable status.
    ///
    /// # Errors
    ///
    /// Returns `StatusNotAssignable` for `Recebido` and `NotFound` for an
    /// unknown order.
    pub fn set_status(&mut self, id: OrderId, status: OrderStatus) -> Result<&Order, OrderError> {
        if !status.is_assignable() {
            return Err(OrderError::StatusNotAssignable(status));
        }
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(OrderError::NotFound(id))?;
        order.status = status;
        Ok(order)
    }

    /// Remove an order and its lines. Stock is not restored.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown order.
    pub fn delete(&mut self, id: OrderId) -> Result<Order, OrderError> {
        let position = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(OrderError::NotFound(id))?;
        Ok(self.orders.remove(position))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fraterno_core::Cart;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                { "id": "1", "nome": "Burger", "categoria": "lanches", "preco": 12.5, "estoque": 5 },
                { "id": "2", "nome": "Soda", "categoria": "bebidas", "preco": 5, "estoque": 1 }
            ]"#,
        )
        .unwrap()
    }

    fn request(name: &str, items: &[(&str, &str, u32)]) -> OrderRequest {
        let mut cart = Cart::new();
        for &(id, price, quantity) in items {
            for _ in 0..quantity {
                cart.add(ProductId::from(id), id, Price::parse(price).unwrap());
            }
        }
        OrderRequest {
            customer_name: name.to_owned(),
            cart,
        }
    }

    #[test]
    fn test_place_order() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();

        let order = book
            .place(&mut catalog, &request(" Maria ", &[("1", "12.50", 2), ("2", "5", 1)]))
            .unwrap();

        assert_eq!(order.id, OrderId::new(1));
        assert_eq!(order.customer_name, "Maria");
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.total.display(), "R$ 30.00");
        assert_eq!(order.lines.len(), 2);
        assert_eq!(catalog.get(&ProductId::from("1")).unwrap().stock, 3);
        assert_eq!(catalog.get(&ProductId::from("2")).unwrap().stock, 0);
    }

    #[test]
    fn test_lines_use_catalog_price() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();

        let order = book
            .place(&mut catalog, &request("Ana", &[("1", "0.01", 1)]))
            .unwrap();

        assert_eq!(order.total.display(), "R$ 0.01");
        assert_eq!(order.lines[0].unit_price.display(), "R$ 12.50");
    }

    #[test]
    fn test_unknown_or_short_items_skipped() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();

        let order = book
            .place(
                &mut catalog,
                &request("Ana", &[("2", "5", 3), ("99", "1", 1), ("1", "12.5", 1)]),
            )
            .unwrap();

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].product_id, ProductId::from("1"));
        assert_eq!(catalog.get(&ProductId::from("2")).unwrap().stock, 1);
        assert_eq!(order.total.display(), "R$ 28.50");
    }

    #[test]
    fn test_one_customer_per_name() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();

        book.place(&mut catalog, &request("Maria", &[("1", "12.5", 1)]))
            .unwrap();
        book.place(&mut catalog, &request("Maria", &[("1", "12.5", 1)]))
            .unwrap();
        book.place(&mut catalog, &request("maria", &[("1", "12.5", 1)]))
            .unwrap();

        assert_eq!(book.customers().len(), 2);
        assert_eq!(book.orders()[0].customer_id, book.orders()[1].customer_id);
        assert_ne!(book.orders()[0].customer_id, book.orders()[2].customer_id);
    }

    #[test]
    fn test_invalid_requests_record_nothing() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();

        assert!(matches!(
            book.place(&mut catalog, &request("  ", &[("1", "12.5", 1)])),
            Err(OrderError::InvalidName(CustomerNameError::Blank))
        ));
        assert!(matches!(
            book.place(&mut catalog, &request(&"x".repeat(101), &[("1", "12.5", 1)])),
            Err(OrderError::InvalidName(CustomerNameError::TooLong { .. }))
        ));
        assert!(matches!(
            book.place(&mut catalog, &request("Ana", &[])),
            Err(OrderError::EmptyCart)
        ));

        let zero: OrderRequest = serde_json::from_value(serde_json::json!({
            "nome_cliente": "Ana",
            "carrinho": [{ "id": "1", "nome": "Burger", "preco": 12.5, "quantidade": 0 }]
        }))
        .unwrap();
        assert!(matches!(
            book.place(&mut catalog, &zero),
            Err(OrderError::InvalidItem { .. })
        ));

        let negative: OrderRequest = serde_json::from_value(serde_json::json!({
            "nome_cliente": "Ana",
            "carrinho": [{ "id": "1", "nome": "Burger", "preco": -1, "quantidade": 1 }]
        }))
        .unwrap();
        assert!(matches!(
            book.place(&mut catalog, &negative),
            Err(OrderError::InvalidItem { .. })
        ));

        assert!(book.orders().is_empty());
        assert!(book.customers().is_empty());
        assert_eq!(catalog.get(&ProductId::from("1")).unwrap().stock, 5);
    }

    #[test]
    fn test_overflowing_total_is_rejected_before_taking_stock() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();

        let huge: OrderRequest = serde_json::from_value(serde_json::json!({
            "nome_cliente": "Ana",
            "carrinho": [
                { "id": "2", "nome": "Soda", "preco": 5, "quantidade": 1 },
                { "id": "1", "nome": "Burger", "preco": 7.0e28, "quantidade": 2 }
            ]
        }))
        .unwrap();

        let err = book.place(&mut catalog, &huge).unwrap_err();

        assert!(matches!(err, OrderError::InvalidItem { ref id, .. } if id.as_str() == "1"));
        assert_eq!(catalog.get(&ProductId::from("1")).unwrap().stock, 5);
        assert_eq!(catalog.get(&ProductId::from("2")).unwrap().stock, 1);
        assert!(book.orders().is_empty());
        assert!(book.customers().is_empty());
    }

    #[test]
    fn test_set_status() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();
        let id = book
            .place(&mut catalog, &request("Ana", &[("1", "12.5", 1)]))
            .unwrap()
            .id;

        let order = book.set_status(id, OrderStatus::InProduction).unwrap();
        assert_eq!(order.status, OrderStatus::InProduction);

        assert!(matches!(
            book.set_status(id, OrderStatus::Received),
            Err(OrderError::StatusNotAssignable(_))
        ));
        assert!(matches!(
            book.set_status(OrderId::new(42), OrderStatus::Completed),
            Err(OrderError::NotFound(_))
        ));
        assert_eq!(book.get(id).unwrap().status, OrderStatus::InProduction);
    }

    #[test]
    fn test_delete() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();
        let first = book
            .place(&mut catalog, &request("Ana", &[("1", "12.5", 1)]))
            .unwrap()
            .id;
        let second = book
            .place(&mut catalog, &request("Bia", &[("1", "12.5", 1)]))
            .unwrap()
            .id;

        assert_eq!(book.delete(first).unwrap().customer_name, "Ana");
        assert!(matches!(book.delete(first), Err(OrderError::NotFound(_))));
        assert_eq!(book.orders().len(), 1);
        assert_eq!(book.orders()[0].id, second);

        let third = book
            .place(&mut catalog, &request("Ana", &[("1", "12.5", 1)]))
            .unwrap()
            .id;
        assert_eq!(third, OrderId::new(3));
    }

    #[test]
    fn test_order_json_shape() {
        let mut catalog = catalog();
        let mut book = OrderBook::new();
        let order = book
            .place(&mut catalog, &request("Ana", &[("1", "12.5", 2)]))
            .unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["nome_cliente"], "Ana");
        assert_eq!(json["valor_total"], 25.0);
        assert_eq!(json["status"], "Recebido");
        assert_eq!(json["itens"][0]["produto_id"], "1");
        assert_eq!(json["itens"][0]["quantidade"], 2);
        assert_eq!(json["itens"][0]["preco_unitario"], 12.5);
    }
}
