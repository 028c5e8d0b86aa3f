//! Unit lookup endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/units/{unit}/section
pub async fn section(
    State(state): State<AppState>,
    Path(unit): Path<u32>,
) -> Result<Json<UnitSectionResponse>> {
    let id = state.tracker.resolve(unit)?;
    let section = *state
        .tracker
        .layout()
        .get(id)
        .ok_or_else(|| ApiError::Internal(format!("section {} missing from layout", id)))?;
    Ok(Json(UnitSectionResponse { unit, section }))
}
