/// User administration endpoints
///
/// All routes require a bearer token whose roles include `Admin` or
/// `Manager` (see `app::build_router`).
///
/// # Endpoints
///
/// - `GET /users` - List users
/// - `POST /users` - Create user
/// - `PATCH /users` - Update user
/// - `DELETE /users` - Delete user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::validated_body,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::user::{CreateUser, UpdateUser, UserView},
    repository::RepositoryError,
};
use uuid::Uuid;
use validator::Validate;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const USER_ID_REQUIRED: &str = "User ID is required";

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,

    #[validate(required, length(min = 1))]
    pub password: Option<String>,

    #[validate(required, length(min = 1))]
    pub roles: Option<Vec<String>>,
}

/// Update user request
///
/// An absent or empty `password` leaves the stored password unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(rename = "_id")]
    #[validate(required)]
    pub id: Option<Uuid>,

    #[validate(required, length(min = 1))]
    pub username: Option<String>,

    #[validate(required, length(min = 1))]
    pub roles: Option<Vec<String>>,

    #[validate(required)]
    pub active: Option<bool>,

    pub password: Option<String>,
}

/// Delete user request
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteUserRequest {
    #[serde(rename = "_id")]
    #[validate(required)]
    pub id: Option<Uuid>,
}

/// Confirmation message returned by mutating endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Maps a failed user write
///
/// Any database-level rejection of the record other than a duplicate
/// username is the caller's fault and answers 400.
fn user_write_error(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::Database(sqlx::Error::Database(db_err)) => {
            tracing::warn!(error = %db_err, "Store rejected user record");
            ApiError::BadRequest("Invalid user data received".to_string())
        }
        other => other.into(),
    }
}

/// List all users
///
/// # Response
///
/// ```json
/// [
///   {
///     "_id": "uuid",
///     "username": "alice",
///     "roles": ["Employee"],
///     "active": true,
///     "createdAt": "...",
///     "updatedAt": "..."
///   }
/// ]
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No users exist
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = state.users.list().await?;

    if users.is_empty() {
        return Err(ApiError::NotFound("No User found".to_string()));
    }

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Create a user
///
/// # Request
///
/// ```json
/// { "username": "alice", "password": "pw", "roles": ["Employee"] }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty field, or the store refused the record
/// - `409 Conflict`: Username already taken
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let req = validated_body(payload, ALL_FIELDS_REQUIRED)?;
    let (Some(username), Some(password), Some(roles)) = (req.username, req.password, req.roles)
    else {
        return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
    };

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(ApiError::Conflict("Duplicate username".to_string()));
    }

    let password_hash = state.hasher.hash_async(password).await?;

    let user = state
        .users
        .create(CreateUser {
            username,
            password_hash,
            roles,
        })
        .await
        .map_err(user_write_error)?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        actor = %actor.username,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        MessageResponse::new(format!("New user {} created", user.username)),
    ))
}

/// Update a user
///
/// # Request
///
/// ```json
/// {
///   "_id": "uuid",
///   "username": "alice2",
///   "roles": ["Manager"],
///   "active": true,
///   "password": "optional"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing field, non-boolean `active`, or the store refused the record
/// - `404 Not Found`: No user with `_id`
/// - `409 Conflict`: Another user has the username
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let req = validated_body(payload, ALL_FIELDS_REQUIRED)?;
    let (Some(id), Some(username), Some(roles), Some(active)) =
        (req.id, req.username, req.roles, req.active)
    else {
        return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
    };

    if state.users.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if let Some(existing) = state.users.find_by_username(&username).await? {
        if existing.id != id {
            return Err(ApiError::Conflict("Duplicate username".to_string()));
        }
    }

    let password_hash = match req.password.filter(|p| !p.is_empty()) {
        Some(password) => Some(state.hasher.hash_async(password).await?),
        None => None,
    };
    let password_changed = password_hash.is_some();

    let updated = state
        .users
        .update(
            id,
            UpdateUser {
                username,
                roles,
                active,
                password_hash,
            },
        )
        .await
        .map_err(user_write_error)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %updated.id,
        password_changed,
        actor = %actor.username,
        "User updated"
    );

    Ok(MessageResponse::new(format!("{} updated", updated.username)))
}

/// Delete a user
///
/// Users that still have tasks cannot be deleted.
///
/// # Request
///
/// ```json
/// { "_id": "uuid" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing `_id`
/// - `404 Not Found`: No user with `_id`
/// - `409 Conflict`: User has assigned tasks
///
/// # Response
///
/// A bare JSON string:
///
/// ```json
/// "Username alice with ID <uuid> deleted successfully"
/// ```
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> ApiResult<Json<String>> {
    let req = validated_body(payload, USER_ID_REQUIRED)?;
    let Some(id) = req.id else {
        return Err(ApiError::BadRequest(USER_ID_REQUIRED.to_string()));
    };

    if state.tasks.exists_for_user(id).await? {
        return Err(ApiError::Conflict("User has assigned task".to_string()));
    }

    let deleted = state
        .users
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %deleted.id, actor = %actor.username, "User deleted");

    Ok(Json(format!(
        "Username {} with ID {} deleted successfully",
        deleted.username, deleted.id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_requires_every_field() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"username": "alice", "roles": ["Employee"]}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateUserRequest =
            serde_json::from_str(r#"{"username": "alice", "password": "pw", "roles": []}"#)
                .unwrap();
        assert!(req.validate().is_err());

        let req: CreateUserRequest = serde_json::from_str(
            r#"{"username": "alice", "password": "pw", "roles": ["Employee"]}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_password_optional() {
        let id = Uuid::new_v4();
        let req: UpdateUserRequest = serde_json::from_str(&format!(
            r#"{{"_id": "{}", "username": "bob", "roles": ["Manager"], "active": false}}"#,
            id
        ))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.id, Some(id));
        assert!(req.password.is_none());
    }

    #[test]
    fn test_update_request_rejects_non_boolean_active() {
        let result: Result<UpdateUserRequest, _> = serde_json::from_str(
            r#"{"_id": "00000000-0000-0000-0000-000000000000", "username": "bob", "roles": ["Manager"], "active": "yes"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_user_write_error_mapping() {
        let err = user_write_error(RepositoryError::InvalidUser("too long".to_string()));
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid user data received"));

        let err = user_write_error(RepositoryError::DuplicateUsername("alice".to_string()));
        assert!(matches!(err, ApiError::Conflict(_)));

        let err = user_write_error(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_delete_request_requires_id() {
        let req: DeleteUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
