//! Order board access control.
//!
//! Staff tools send the shared admin token in the `x-admin-token` header.
//! There is no login flow; without a configured token the order board is
//! closed to everyone.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extractor that requires the admin token.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_orders(_admin: RequireAdmin, State(state): State<AppState>) -> impl IntoResponse {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

/// Returned when the admin token is missing or wrong.
#[derive(Debug, Clone, Copy)]
pub enum AdminRejection {
    /// No token configured on the server.
    Disabled,
    /// Header absent or not matching.
    InvalidToken,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Disabled => "Order board is disabled",
            Self::InvalidToken => "Invalid admin token",
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = state.config();
        if config.admin_token.is_none() {
            return Err(AdminRejection::Disabled);
        }

        let provided = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        if config.admin_token_matches(provided) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "rejected order board request");
            Err(AdminRejection::InvalidToken)
        }
    }
}
