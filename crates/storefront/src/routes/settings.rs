//! Snack-bar opening status and visitor notice.

use axum::{Json, extract::State};
use fraterno_core::SnackBarStatus;
use serde::Deserialize;
use tracing::instrument;

use crate::config::SnackBarConfig;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NoticeChange {
    #[serde(rename = "aviso", default)]
    pub notice: Option<String>,
}

/// Current status and notice.
///
/// GET /api/lanchonete
#[instrument(skip_all)]
pub async fn show(_admin: RequireAdmin, State(state): State<AppState>) -> Json<SnackBarConfig> {
    Json(state.snack_bar().read().await.clone())
}

/// Open or close the snack bar.
///
/// POST /api/lanchonete/status
#[instrument(skip(state, change), fields(status = %change.status))]
pub async fn change_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(change): Json<StatusChange>,
) -> Result<Json<SnackBarConfig>> {
    let status = change
        .status
        .parse::<SnackBarStatus>()
        .map_err(AppError::BadRequest)?;

    let mut snack_bar = state.snack_bar().write().await;
    snack_bar.status = status;
    tracing::info!(%status, "snack bar status changed");
    Ok(Json(snack_bar.clone()))
}

/// Set or clear the notice shown above the menu.
///
/// POST /api/lanchonete/aviso
#[instrument(skip_all)]
pub async fn change_notice(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(change): Json<NoticeChange>,
) -> Json<SnackBarConfig> {
    let mut snack_bar = state.snack_bar().write().await;
    snack_bar.set_notice(change.notice.as_deref());
    tracing::info!(has_notice = snack_bar.notice.is_some(), "snack bar notice changed");
    Json(snack_bar.clone())
}
