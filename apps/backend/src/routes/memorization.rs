//! Memorization endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/memorization/plan
pub async fn plan(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DailyPlan>> {
    let plan = state.tracker.daily_plan(auth.user_id).await?;
    Ok(Json(plan))
}

/// GET /api/memorization/progress
pub async fn progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MemorizationRecord>> {
    let record = state.tracker.progress(auth.user_id).await?;
    Ok(Json(record))
}

/// POST /api/memorization/memorize
pub async fn memorize(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<MemorizeRequest>,
) -> Result<Json<MemorizeOutcome>> {
    let outcome = state.tracker.memorize(auth.user_id, request.unit).await?;
    Ok(Json(outcome))
}

/// POST /api/memorization/review
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewOutcome>> {
    let outcome = state
        .tracker
        .review(auth.user_id, request.unit, request.quality)
        .await?;
    Ok(Json(outcome))
}
