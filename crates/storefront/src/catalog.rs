//! Snack-bar product catalog.
//!
//! Products are loaded at start-up from a JSON array and kept in memory.
//! Staff add, edit and remove products through the admin API; stock is
//! decremented as orders are placed.
//!
//! ```json
//! [ { "id": "1", "nome": "Coxinha", "categoria": "salgados", "preco": 6.5, "estoque": 40 } ]
//! ```

use std::path::Path;

use fraterno_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("invalid product: {0}")]
    InvalidProduct(String),
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "preco")]
    pub price: Price,
    #[serde(rename = "estoque", default)]
    pub stock: u32,
    #[serde(rename = "imagem_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Fields staff set when adding or editing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "preco")]
    pub price: Price,
    #[serde(rename = "estoque", default)]
    pub stock: u32,
    #[serde(rename = "imagem_url", default)]
    pub image_url: Option<String>,
}

impl ProductInput {
    fn validate(self) -> Result<Self, CatalogError> {
        let name = self.name.trim();
        let category = self.category.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidProduct("name is blank".into()));
        }
        if category.is_empty() {
            return Err(CatalogError::InvalidProduct("category is blank".into()));
        }
        let price = Price::new(self.price.amount())
            .map_err(|e| CatalogError::InvalidProduct(e.to_string()))?;
        Ok(Self {
            name: name.to_owned(),
            category: category.to_owned(),
            price,
            stock: self.stock,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// The full menu, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (i, product) in products.iter().enumerate() {
            if products.iter().take(i).any(|p| p.id == product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// The menu served when no catalog file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        let product = |id: &str, name: &str, category: &str, cents: i64, stock: u32| Product {
            id: ProductId::from(id),
            name: name.to_owned(),
            category: category.to_owned(),
            price: Price::from_cents(cents),
            stock,
            image_url: None,
        };
        Self {
            products: vec![
                product("1", "Coxinha", "salgados", 650, 40),
                product("2", "Pastel de Queijo", "salgados", 700, 30),
                product("3", "Bolo de Pote", "doces", 900, 15),
                product("4", "Suco Natural", "bebidas", 500, 25),
                product("5", "Refrigerante Lata", "bebidas", 550, 48),
            ],
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Append a product under the next free numeric id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProduct` if the name or category is
    /// blank or the price is negative.
    pub fn add(&mut self, input: ProductInput) -> Result<Product, CatalogError> {
        let input = input.validate()?;
        let next = self
            .products
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let product = Product {
            id: ProductId::new(next.to_string()),
            name: input.name,
            category: input.category,
            price: input.price,
            stock: input.stock,
            image_url: input.image_url,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replace every editable field of a product.
    ///
    /// An absent image keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `InvalidProduct` for bad
    /// input.
    pub fn update(
        &mut self,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<&Product, CatalogError> {
        let input = input.validate()?;
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        product.name = input.name;
        product.category = input.category;
        product.price = input.price;
        product.stock = input.stock;
        if input.image_url.is_some() {
            product.image_url = input.image_url;
        }
        Ok(product)
    }

    /// Remove a product from the menu. Orders that reference it keep their
    /// lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn remove(&mut self, id: &ProductId) -> Result<Product, CatalogError> {
        let position = self
            .products
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        Ok(self.products.remove(position))
    }

    /// Take `quantity` units out of stock.
    ///
    /// Returns the catalog price, or `None` (leaving stock untouched) if the
    /// product is unknown or has fewer than `quantity` units.
    pub fn reserve(&mut self, id: &ProductId, quantity: u32) -> Option<Price> {
        let product = self.products.iter_mut().find(|p| p.id == *id)?;
        product.stock = product.stock.checked_sub(quantity)?;
        Some(product.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MENU: &str = r#"[
        { "id": "1", "nome": "Burger", "categoria": "Lanches", "preco": 12.5, "estoque": 3 },
        { "id": "2", "nome": "Soda", "categoria": "Bebidas", "preco": 5, "estoque": 0,
          "imagem_url": "/static/img/soda.jpg" },
        { "id": "3", "nome": "Misto", "categoria": "Lanches", "preco": 8 }
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(MENU).unwrap();
        assert_eq!(catalog.products().len(), 3);

        let soda = catalog.get(&ProductId::from("2")).unwrap();
        assert_eq!(soda.price.display(), "R$ 5.00");
        assert_eq!(soda.image_url.as_deref(), Some("/static/img/soda.jpg"));
        assert!(!soda.in_stock());

        assert_eq!(catalog.get(&ProductId::from("3")).unwrap().stock, 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            { "id": "1", "nome": "A", "categoria": "x", "preco": 1 },
            { "id": "1", "nome": "B", "categoria": "x", "preco": 2 }
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id.as_str() == "1"
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::from_json(MENU).unwrap();
        assert_eq!(catalog.categories(), ["Lanches", "Bebidas"]);
    }

    #[test]
    fn test_reserve_decrements_stock() {
        let mut catalog = Catalog::from_json(MENU).unwrap();
        let burger = ProductId::from("1");

        assert_eq!(catalog.reserve(&burger, 2).unwrap().display(), "R$ 12.50");
        assert_eq!(catalog.get(&burger).unwrap().stock, 1);

        assert!(catalog.reserve(&burger, 2).is_none());
        assert_eq!(catalog.get(&burger).unwrap().stock, 1);

        assert!(catalog.reserve(&ProductId::from("99"), 1).is_none());
    }

    fn input(name: &str, category: &str, price: f64, stock: u32) -> ProductInput {
        serde_json::from_value(serde_json::json!({
            "nome": name, "categoria": category, "preco": price, "estoque": stock
        }))
        .unwrap()
    }

    #[test]
    fn test_add_assigns_next_numeric_id() {
        let mut catalog = Catalog::from_json(MENU).unwrap();

        let added = catalog.add(input(" Tapioca ", "Lanches", 7.0, 10)).unwrap();
        assert_eq!(added.id.as_str(), "4");
        assert_eq!(added.name, "Tapioca");
        assert_eq!(added.price.display(), "R$ 7.00");

        let mut empty = Catalog::default();
        assert_eq!(empty.add(input("Água", "Bebidas", 2.0, 1)).unwrap().id.as_str(), "1");
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut catalog = Catalog::from_json(MENU).unwrap();
        assert!(matches!(
            catalog.add(input("  ", "Lanches", 1.0, 1)),
            Err(CatalogError::InvalidProduct(_))
        ));
        assert!(matches!(
            catalog.add(input("Misto", "", 1.0, 1)),
            Err(CatalogError::InvalidProduct(_))
        ));
        assert!(matches!(
            catalog.add(input("Misto", "Lanches", -1.0, 1)),
            Err(CatalogError::InvalidProduct(_))
        ));
        assert_eq!(catalog.products().len(), 3);
    }

    #[test]
    fn test_update_keeps_image_when_absent() {
        let mut catalog = Catalog::from_json(MENU).unwrap();
        let soda = ProductId::from("2");

        let updated = catalog.update(&soda, input("Soda Zero", "Bebidas", 6.0, 12)).unwrap();
        assert_eq!(updated.name, "Soda Zero");
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.image_url.as_deref(), Some("/static/img/soda.jpg"));

        assert!(matches!(
            catalog.update(&ProductId::from("99"), input("X", "Y", 1.0, 1)),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove() {
        let mut catalog = Catalog::from_json(MENU).unwrap();
        let burger = ProductId::from("1");

        assert_eq!(catalog.remove(&burger).unwrap().name, "Burger");
        assert!(catalog.get(&burger).is_none());
        assert!(matches!(catalog.remove(&burger), Err(CatalogError::NotFound(_))));
        assert_eq!(catalog.categories(), ["Bebidas", "Lanches"]);
    }

    #[test]
    fn test_builtin_is_valid() {
        let builtin = Catalog::builtin();
        assert!(Catalog::new(builtin.products().to_vec()).is_ok());
        assert!(builtin.products().iter().all(Product::in_stock));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = Catalog::load(Path::new("/nonexistent/catalog.json")).await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
