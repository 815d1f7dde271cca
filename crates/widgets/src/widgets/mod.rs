//! The page widgets.
//!
//! Each widget binds to its own anchors through `mount`, which returns `None`
//! when the current page does not carry them. Widgets never reference each
//! other.

pub mod cart;
pub mod category_filter;
pub mod contact;
pub mod lightbox;
pub mod menu;
pub mod reveal;
pub mod search;
pub mod typing;

pub use cart::{CartWidget, PendingOrder, SubmitOutcome};
pub use category_filter::{CategoryFilter, FilterSelection};
pub use contact::ContactForm;
pub use lightbox::Lightbox;
pub use menu::MenuToggle;
pub use reveal::{Intersection, ScrollReveal};
pub use search::DashboardSearch;
pub use typing::{TypingEffect, TypingProgress};
