//! Status enums for orders and the snack bar.

use serde::{Deserialize, Serialize};

/// Lifecycle of an order placed through the snack-bar cart.
///
/// Serialized with the labels staff see on the order board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Just submitted by a customer.
    #[default]
    #[serde(rename = "Recebido")]
    Received,
    #[serde(rename = "Em Produção")]
    InProduction,
    #[serde(rename = "Disponível para Retirada")]
    ReadyForPickup,
    #[serde(rename = "Concluído")]
    Completed,
}

impl OrderStatus {
    /// Statuses staff may move an order into.
    pub const ASSIGNABLE: [Self; 3] = [Self::InProduction, Self::ReadyForPickup, Self::Completed];

    /// The label shown on the order board.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Received => "Recebido",
            Self::InProduction => "Em Produção",
            Self::ReadyForPickup => "Disponível para Retirada",
            Self::Completed => "Concluído",
        }
    }

    /// Whether staff may set this status by hand.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        Self::ASSIGNABLE.contains(self)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recebido" => Ok(Self::Received),
            "Em Produção" => Ok(Self::InProduction),
            "Disponível para Retirada" => Ok(Self::ReadyForPickup),
            "Concluído" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Whether the snack bar is taking orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SnackBarStatus {
    #[default]
    #[serde(rename = "aberta")]
    Open,
    #[serde(rename = "fechada")]
    Closed,
}

impl SnackBarStatus {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for SnackBarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "aberta"),
            Self::Closed => write!(f, "fechada"),
        }
    }
}

impl std::str::FromStr for SnackBarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aberta" | "open" => Ok(Self::Open),
            "fechada" | "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid snack bar status: {s}")),
        }
    }
}
