//! Request utilities for HTTP endpoints.

use std::fmt::Display;

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use serde::Deserialize;
use tokio::time;

use crate::router::RouterError;
use user_store::{NewUser, StoreError, UserPatch};

pub const USER_NOT_FOUND: &str = "User not found";
pub const EMAIL_EXISTS: &str = "Email already exists";
pub const MISSING_FIELDS: &str = "Missing 'name' or 'email' in request body";
pub const BODY_REQUIRED: &str = "Request body required";
pub const INVALID_FIELDS: &str = "'name' and 'email' must be non-empty strings";

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout<B>(
    req: Request<B>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.into_body().collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Runs a blocking store operation on the blocking pool with a timeout.
///
/// Store writes fsync the data file, so they stay off the async workers.
pub async fn run_store_operation<T, F>(op: F, timeout_ms: u64) -> Result<T, RouterError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    time::timeout(timeout_duration, tokio::task::spawn_blocking(op))
        .await
        .map_err(|_| {
            // The blocking task keeps running and may still commit
            tracing::warn!(
                "Store operation exceeded {} ms; responding 408 while it continues",
                timeout_ms
            );
            RouterError::Timeout
        })?
        .map_err(|e| RouterError::InternalError(format!("Store task failed: {}", e)))?
        .map_err(map_store_error_to_router_error)
}

/// Map StoreError to appropriate RouterError
pub fn map_store_error_to_router_error(e: StoreError) -> RouterError {
    match e {
        StoreError::UserNotFound { .. } => RouterError::NotFound(USER_NOT_FOUND.to_string()),
        StoreError::DuplicateEmail { .. } => RouterError::BadRequest(EMAIL_EXISTS.to_string()),
        _ => RouterError::InternalError(format!("Storage error: {}", e)),
    }
}

/// Parses the `{id}` path segment. Only non-negative integers are ids.
pub fn parse_user_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Request to create a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Required, non-empty
    #[serde(default)]
    pub name: Option<String>,
    /// Required, non-empty, unique
    #[serde(default)]
    pub email: Option<String>,
}

impl CreateUserRequest {
    /// Checks required fields and produces the store payload.
    pub fn validate(self) -> Result<NewUser, RouterError> {
        match (self.name, self.email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Ok(NewUser { name, email })
            }
            _ => Err(RouterError::BadRequest(MISSING_FIELDS.to_string())),
        }
    }
}

/// Request to partially update a user.
///
/// Absent and `null` fields are left unchanged; unknown keys are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Checks present fields and produces the store patch.
    pub fn validate(self) -> Result<UserPatch, RouterError> {
        let empty = |field: &Option<String>| field.as_deref().is_some_and(str::is_empty);
        if empty(&self.name) || empty(&self.email) {
            return Err(RouterError::BadRequest(INVALID_FIELDS.to_string()));
        }
        Ok(UserPatch {
            name: self.name,
            email: self.email,
        })
    }
}

/// Parses and validates a create body.
///
/// Anything other than a JSON object with non-empty string `name` and
/// `email` is reported as missing fields.
pub fn parse_create_request(body: &[u8]) -> Result<NewUser, RouterError> {
    let missing = || RouterError::BadRequest(MISSING_FIELDS.to_string());
    let fields = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => fields,
        _ => return Err(missing()),
    };

    let request: CreateUserRequest =
        serde_json::from_value(serde_json::Value::Object(fields)).map_err(|_| missing())?;
    request.validate()
}

/// Parses and validates an update body.
///
/// An empty body, invalid JSON, a non-object or an empty object all count
/// as no body.
pub fn parse_update_request(body: &[u8]) -> Result<UserPatch, RouterError> {
    let fields = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) if !fields.is_empty() => fields,
        _ => return Err(RouterError::BadRequest(BODY_REQUIRED.to_string())),
    };

    let request: UpdateUserRequest = serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|_| RouterError::BadRequest(INVALID_FIELDS.to_string()))?;
    request.validate()
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
