/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; an `ApiError` turns into a JSON body
/// `{"error": "<code>", "message": "<text>"}` with the matching status code.
///
/// # Conventions
///
/// - Missing or malformed input, or a record the store refuses: 400
/// - Missing or invalid credentials: 401
/// - Authenticated but lacking a required role: 403
/// - Missing resource: 404 (never a 200 with a "not found" message)
/// - Duplicate username or a user blocked by its tasks: 409
/// - Store and hashing failures: 500, details logged and hidden from clients
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("User not found".to_string()));
///     }
///     Ok(Json(json!({ "message": "ok" })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt::JwtError, middleware::AuthError, password::PasswordError},
    repository::RepositoryError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Status code and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateUsername(_) => {
                ApiError::Conflict("Duplicate username".to_string())
            }
            RepositoryError::UserHasTasks(_) => {
                ApiError::Conflict("User has assigned task".to_string())
            }
            RepositoryError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
            RepositoryError::InvalidUser(reason) => {
                tracing::debug!(%reason, "Store refused user record");
                ApiError::BadRequest("Invalid user data received".to_string())
            }
            RepositoryError::Database(err) => {
                ApiError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing authorization header".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(jwt_err) => jwt_err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("All fields are required".to_string());
        assert_eq!(err.to_string(), "Bad request: All fields are required");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_repository_error_mapping() {
        let err: ApiError = RepositoryError::DuplicateUsername("alice".to_string()).into();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Duplicate username"));

        let err: ApiError = RepositoryError::UserHasTasks(Uuid::new_v4()).into();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "User has assigned task"));

        let err: ApiError = RepositoryError::UserNotFound(Uuid::new_v4()).into();
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);

        let err: ApiError = RepositoryError::InvalidUser("roles must not be empty".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid user data received"));

        let err: ApiError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_forbidden_status() {
        let err = ApiError::Forbidden("Forbidden".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::FORBIDDEN, "forbidden"));
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = AuthError::MissingCredentials.into();
        assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);

        let err: ApiError = AuthError::InvalidFormat("Expected Bearer token".to_string()).into();
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);

        let err: ApiError = AuthError::InvalidToken(JwtError::Expired).into();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Token expired"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            ApiError::InternalError("connection refused at 10.0.0.5".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "internal_error");
        assert_eq!(body.message, "An internal error occurred");
    }
}
