//! Access-control middleware
//!
//! Two gates wrap protected routes: `require_user` (a resolvable session)
//! and `require_admin` (a resolvable session plus the admin flag). Both
//! resolve the full User record and insert it into request extensions for
//! the downstream handler. Store failures during gate evaluation are server
//! faults (500), never authorization failures.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::{error::ApiError, models::User, state::AppState};

/// Resolve the session cookie to a full User record. `Ok(None)` means no
/// usable session; store failures surface as 500.
async fn resolve_user(state: &AppState, jar: &CookieJar) -> Result<Option<User>, ApiError> {
    let Some(cookie) = jar.get(&state.config.cookie_name) else {
        return Ok(None);
    };

    let user_id = state.sessions.get(cookie.value()).await.map_err(|e| {
        error!("Failed to resolve session: {}", e);
        ApiError::InternalServerError
    })?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let user = state.users.find_by_id(user_id).await.map_err(|e| {
        error!("Failed to load session user: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(user)
}

/// Authenticated gate: requires a resolvable session.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    match resolve_user(&state, &jar).await? {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => Err(ApiError::Unauthorized),
    }
}

/// Admin gate: requires a resolvable session and the admin flag.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    let Some(cookie) = jar.get(&state.config.cookie_name) else {
        return Err(ApiError::AuthenticationRequired);
    };

    let user_id = state.sessions.get(cookie.value()).await.map_err(|e| {
        error!("Failed to resolve session: {}", e);
        ApiError::InternalServerError
    })?;

    let Some(user_id) = user_id else {
        return Err(ApiError::AuthenticationRequired);
    };

    let user = state.users.find_by_id(user_id).await.map_err(|e| {
        error!("Failed to load session user: {}", e);
        ApiError::InternalServerError
    })?;

    match user {
        Some(user) if user.is_admin => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Some(_) => Err(ApiError::Forbidden),
        // The session outlived its user record; treat it like no session.
        None => Err(ApiError::AuthenticationRequired),
    }
}
