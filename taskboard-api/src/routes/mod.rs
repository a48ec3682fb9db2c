/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login endpoint
/// - `users`: User administration endpoints

pub mod auth;
pub mod health;
pub mod users;

use crate::error::{ApiError, ApiResult};
use axum::{extract::rejection::JsonRejection, Json};
use validator::Validate;

/// Unwraps and validates a JSON body
///
/// A body that fails to parse and one that fails validation are reported
/// alike, as `400` with `message`.
pub(crate) fn validated_body<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
) -> ApiResult<T> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest(message.to_string())
    })?;

    body.validate().map_err(|errors| {
        tracing::debug!(fields = ?errors.field_errors().keys().collect::<Vec<_>>(), "Validation failed");
        ApiError::BadRequest(message.to_string())
    })?;

    Ok(body)
}
