//! Settings endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/settings
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<LearnerSettings>> {
    let record = state.tracker.progress(auth.user_id).await?;
    Ok(Json(record.settings))
}

/// PUT /api/settings
///
/// Out-of-range values are clamped and listed under `adjustments`.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<SettingsPatch>,
) -> Result<Json<SettingsUpdate>> {
    let update = state.tracker.update_settings(auth.user_id, request).await?;
    Ok(Json(update))
}
