//! Core types for the Fraterno Amor site.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer_name;
pub mod id;
pub mod price;
pub mod status;

pub use customer_name::{CustomerName, CustomerNameError};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price, PriceError};
pub use status::*;
