//! User CRUD (Create, Read, Update, Delete) handlers.

use std::fmt::Display;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use serde::Serialize;

use crate::router::{AppState, RouterError};

use super::request_utils::{
    build_response, parse_create_request, parse_update_request,
    read_request_body_with_timeout, run_store_operation,
};
use super::response::{data_message_response, data_response, message_response};

fn envelope_response<T: Serialize>(
    status: u16,
    envelope: &T,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(envelope)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Lists all users.
///
/// # Endpoint
/// `GET /users`
///
/// # Response
/// - **200 OK**: `{"status": 200, "data": [{"id": 1, "name": "...", "email": "..."}]}`
pub async fn list_users(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let store = state.store.clone();
    let users = run_store_operation(move || store.list_all(), state.config.response_timeout_ms)
        .await?;

    envelope_response(200, &data_response(200, users))
}

/// Creates a new user.
///
/// # Endpoint
/// `POST /users`
///
/// # Request Body
/// ```json
/// {
///   "name": "Zara Khan",
///   "email": "zara.khan@example.com"
/// }
/// ```
///
/// # Response
/// - **201 Created**: `{"status": 201, "message": "User created", "data": {...}}`
///
/// # Errors
/// - **400 Bad Request**: Missing or empty `name`/`email`, or email already exists
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:5000/users \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Zara Khan", "email": "zara.khan@example.com"}'
/// ```
pub async fn create_user<B>(
    req: Request<B>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    let new_user = parse_create_request(&body_bytes)?;

    let store = state.store.clone();
    let user = run_store_operation(
        move || store.insert(new_user),
        state.config.response_timeout_ms,
    )
    .await?;

    tracing::info!("Created user {}", user.id);
    envelope_response(201, &data_message_response(201, "User created", user))
}

/// Fetches a single user.
///
/// # Endpoint
/// `GET /users/{id}`
///
/// # Response
/// - **200 OK**: `{"status": 200, "data": {...}}`
///
/// # Errors
/// - **404 Not Found**: No user with this id
pub async fn get_user(id: u64, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let store = state.store.clone();
    let user =
        run_store_operation(move || store.get_by_id(id), state.config.response_timeout_ms).await?;

    envelope_response(200, &data_response(200, user))
}

/// Partially updates a user.
///
/// # Endpoint
/// `PUT /users/{id}`
///
/// # Request Body
/// ```json
/// {
///   "name": "Updated Name"
/// }
/// ```
///
/// # Response
/// - **200 OK**: `{"status": 200, "message": "User updated", "data": {...}}`
///
/// # Errors
/// - **404 Not Found**: No user with this id (checked before the body)
/// - **400 Bad Request**: Empty body or `{}`, invalid field values, or email already exists
///
/// # Notes
/// - Only fields present in the body are changed
/// - An object with no known fields returns the user unchanged
pub async fn update_user<B>(
    req: Request<B>,
    id: u64,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Display,
{
    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;

    let store = state.store.clone();
    run_store_operation(move || store.get_by_id(id), state.config.response_timeout_ms).await?;

    let patch = parse_update_request(&body_bytes)?;

    let store = state.store.clone();
    let user = run_store_operation(
        move || store.update(id, patch),
        state.config.response_timeout_ms,
    )
    .await?;

    tracing::info!("Updated user {}", id);
    envelope_response(200, &data_message_response(200, "User updated", user))
}

/// Deletes a user.
///
/// # Endpoint
/// `DELETE /users/{id}`
///
/// # Response
/// - **200 OK**: `{"status": 200, "message": "User deleted"}`
///
/// # Errors
/// - **404 Not Found**: No user with this id
pub async fn delete_user(id: u64, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let store = state.store.clone();
    run_store_operation(move || store.delete(id), state.config.response_timeout_ms).await?;

    tracing::info!("Deleted user {}", id);
    envelope_response(200, &message_response(200, "User deleted"))
}
