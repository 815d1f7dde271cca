//! Fraterno Widgets - Headless page behaviour for the Fraterno Amor site.
//!
//! The site's pages are modelled as a [`dom::Document`]. A [`Site`] mounts
//! every widget whose anchors the page carries and routes [`Event`]s to them:
//!
//! - [`widgets::typing`] - Hero heading typing effect
//! - [`widgets::reveal`] - One-shot scroll reveal
//! - [`widgets::category_filter`] - Snack-bar product filter
//! - [`widgets::cart`] - Cart sidebar, checkout and WhatsApp hand-off
//! - [`widgets::menu`] - Mobile navigation toggle
//! - [`widgets::lightbox`] - Gallery image viewer
//! - [`widgets::contact`] - Contact form placeholder
//! - [`widgets::search`] - Member dashboard course search
//!
//! Browser services (alerts, new windows) go through the [`Shell`] trait and
//! order submission through [`OrderGateway`], so the whole page runs in tests
//! without a browser. [`sync::Snapshot`] turns document changes into patches
//! for a real page.
//!
//! # Example
//!
//! ```rust,ignore
//! use fraterno_widgets::{HttpOrderGateway, RecordingShell, Site, SiteConfig};
//!
//! let config = SiteConfig::from_env()?;
//! let gateway = HttpOrderGateway::new(&config)?;
//! let mut site = Site::mount(document, &config, gateway, RecordingShell::new());
//! site.play_typing().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod dom;
pub mod error;
pub mod gateway;
pub mod shell;
pub mod site;
pub mod sync;
pub mod widgets;

pub use config::SiteConfig;
pub use dom::{Display, Document, Element, NodeId};
pub use error::{ConfigError, GatewayError};
pub use gateway::{HttpOrderGateway, OrderGateway};
pub use shell::{OpenedWindow, RecordingShell, Shell};
pub use site::{Event, Site, Submission};
pub use sync::{Patch, Snapshot};
