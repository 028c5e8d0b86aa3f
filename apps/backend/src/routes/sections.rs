//! Section and assessment endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/sections
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SectionListResponse>> {
    let sections = state.tracker.sections(auth.user_id).await?;
    Ok(Json(SectionListResponse { sections }))
}

/// POST /api/sections/{id}/assessment
pub async fn submit_assessment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(section): Path<SectionId>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<AssessmentOutcome>> {
    let outcome = state
        .tracker
        .submit_assessment(auth.user_id, section, &request.answers)
        .await?;
    Ok(Json(outcome))
}
