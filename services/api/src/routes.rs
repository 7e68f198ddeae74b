//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    image_store::image_key,
    middleware::{require_admin, require_user},
    models::{LoginRequest, NewUser, NewUserRequest, User, VinylPayload, hash_password},
    session::generate_token,
    state::AppState,
    validation::{validate_new_user, validate_vinyl},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/vinyls", post(create_vinyl))
        .route("/vinyls/:vinyl_id", put(update_vinyl).delete(delete_vinyl))
        .route("/upload-image", post(upload_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/vinyls", get(list_vinyls))
        .route("/users", post(create_user))
        .route(
            "/session",
            get(current_session)
                .route_layer(middleware::from_fn_with_state(state.clone(), require_user))
                .post(login)
                .delete(logout),
        )
        .merge(admin_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "disclist-api"
    }))
}

/// Get all vinyl records, unauthenticated
pub async fn list_vinyls(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let vinyls = state.vinyls.list().await.map_err(|e| {
        error!("Failed to list vinyls: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(vinyls))
}

/// Create a new vinyl record (admin)
pub async fn create_vinyl(
    State(state): State<AppState>,
    Json(payload): Json<VinylPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_vinyl(&payload).map_err(ApiError::Validation)?;

    let vinyl = state.vinyls.insert(&payload).await.map_err(|e| {
        error!("Failed to save new vinyl: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "vinyl": vinyl})),
    ))
}

/// Update a vinyl record (admin). Every field is overwritten from the
/// payload; callers resend the full object.
pub async fn update_vinyl(
    State(state): State<AppState>,
    Path(vinyl_id): Path<Uuid>,
    Json(payload): Json<VinylPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Existence is checked before validation: an unknown id is 404 even
    // when the payload is also invalid.
    state
        .vinyls
        .find_by_id(vinyl_id)
        .await
        .map_err(|e| {
            error!("Failed to look up vinyl: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Vinyl not found".to_string()))?;

    validate_vinyl(&payload).map_err(ApiError::Validation)?;

    let vinyl = state
        .vinyls
        .update(vinyl_id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update vinyl: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Vinyl not found".to_string()))?;

    Ok(Json(json!({"success": true, "vinyl": vinyl})))
}

/// Delete a vinyl record (admin)
pub async fn delete_vinyl(
    State(state): State<AppState>,
    Path(vinyl_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.vinyls.delete(vinyl_id).await.map_err(|e| {
        error!("Failed to delete vinyl: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound("Vinyl not found".to_string()))
    }
}

/// Upload a cover image to object storage (admin); multipart field `image`
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart body: {}", e);
        ApiError::BadRequest("Invalid multipart body".to_string())
    })? {
        if field.name() == Some("image") {
            // Only a real file part counts; a plain text field named
            // `image` carries no filename and is ignored.
            let Some(original_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| {
                error!("Failed to read upload: {}", e);
                ApiError::BadRequest("Invalid multipart body".to_string())
            })?;

            file = Some((original_name, content_type, bytes));
            break;
        }
    }

    let Some((original_name, content_type, bytes)) = file else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    }

    let key = image_key(&original_name);
    state
        .images
        .put(&key, bytes.to_vec(), &content_type)
        .await
        .map_err(|e| {
            error!("Failed to upload image to object storage: {}", e);
            ApiError::InternalServerError
        })?;

    let image_url = state.images.public_url(&key);
    info!("Uploaded image URL: {}", image_url);

    Ok(Json(json!({"success": true, "imageUrl": image_url})))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_new_user(&payload).map_err(ApiError::Validation)?;

    let password_hash = hash_password(&payload.plain_pass).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let new_user = NewUser {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        user_name: payload.user_name,
        password_hash,
        is_admin: false,
    };

    state.users.insert(&new_user).await.map_err(|e| {
        error!("Failed to save new user: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(StatusCode::CREATED)
}

/// Return the signed-in user resolved by the authenticated gate
pub async fn current_session(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(user)
}

/// Log in: verify credentials, establish a session, set the cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for email: {}", payload.email);

    let user = state.users.find_by_email(&payload.email).await.map_err(|e| {
        error!("Failed to look up user: {}", e);
        ApiError::InternalServerError
    })?;

    let Some(user) = user else {
        // Burn one hash derivation so the unknown-email path costs about
        // as much as a verification. The response never distinguishes an
        // unknown email from a wrong password.
        let _ = hash_password(&payload.plain_pass);
        return Err(ApiError::Unauthorized);
    };

    let verified = user.verify_password(&payload.plain_pass).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;

    if !verified {
        return Err(ApiError::Unauthorized);
    }

    let token = generate_token();
    state.sessions.set(&token, user.id).await.map_err(|e| {
        error!("Failed to store session: {}", e);
        ApiError::InternalServerError
    })?;

    let cookie = Cookie::build((state.config.cookie_name.clone(), token))
        .path("/")
        .http_only(true);

    Ok((jar.add(cookie), StatusCode::CREATED))
}

/// Log out: clear the session unconditionally; idempotent
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(&state.config.cookie_name) {
        if let Err(e) = state.sessions.delete(cookie.value()).await {
            // Logout still succeeds; the session will age out via TTL.
            error!("Failed to clear session: {}", e);
        }
    }

    let removal = Cookie::build((state.config.cookie_name.clone(), "")).path("/");

    Ok((jar.remove(removal), StatusCode::OK))
}
