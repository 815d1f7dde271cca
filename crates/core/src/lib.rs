//! Fraterno Core - Shared types library.
//!
//! This crate provides the domain types used across the Fraterno Amor site:
//! - `widgets` - Headless page widgets (cart, filters, effects)
//! - `storefront` - HTTP service that receives orders and renders the snack-bar page
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, customer names, statuses
//! - [`cart`] - Cart line items and the checkout state machine
//! - [`order`] - Checkout payload and the WhatsApp order summary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem, CartState};
pub use order::{OrderReceipt, OrderRequest, OrderSummary};
pub use types::*;
