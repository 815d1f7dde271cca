//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Order board routes additionally take the [`RequireAdmin`] extractor.

pub mod admin;
pub mod request_id;

pub use admin::{ADMIN_TOKEN_HEADER, AdminRejection, RequireAdmin};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
