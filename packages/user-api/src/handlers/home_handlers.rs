//! Welcome route.

use hyper::{body::Bytes, Response};

use crate::router::RouterError;

use super::request_utils::build_response;
use super::response::{Endpoints, WelcomeResponse};

/// Lists the available endpoints.
///
/// # Endpoint
/// `GET /`
///
/// # Response
/// - **200 OK**: Welcome message and endpoint descriptions
pub fn home() -> Result<Response<Bytes>, RouterError> {
    let welcome = WelcomeResponse {
        status: 200,
        message: "Welcome to User Profile API 👑",
        endpoints: Endpoints {
            list: "List all users",
            create: "Create new user",
            fetch: "Fetch single user",
            update: "Update user",
            delete: "Delete user",
        },
    };

    let json = serde_json::to_vec(&welcome)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;

    build_response(200, json)
}
