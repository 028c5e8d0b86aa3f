//! Learner identification middleware

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// Header carrying the learner's id, set by the fronting auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated learner stored in request extensions
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Auth middleware - extracts the learner id from the X-User-Id header
pub async fn auth_middleware(mut request: Request<Body>, next: Next) -> Result<Response> {
    let header = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

    let user_id = Uuid::parse_str(header.trim())
        .map_err(|_| ApiError::Unauthorized("Invalid X-User-Id header".to_string()))?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}
