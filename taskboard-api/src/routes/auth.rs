/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Exchange username and password for an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::validated_body,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::jwt;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,

    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token
    pub access_token: String,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "pw"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "accessToken": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing username or password
/// - `401 Unauthorized`: Unknown user, inactive user, or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let req = validated_body(payload, "All fields are required")?;
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    };

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .filter(|user| user.active)
        .ok_or_else(unauthorized)?;

    if !state
        .hasher
        .verify_async(password, user.password_hash.clone())
        .await?
    {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(unauthorized());
    }

    let claims = jwt::Claims::new(user.id, &user.username, user.roles, state.access_token_ttl());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { access_token }))
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized".to_string())
}
