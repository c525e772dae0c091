//! Response envelope and helpers for HTTP endpoints.

use serde::Serialize;

/// JSON envelope wrapping every response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Human-readable outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Helper to create an envelope carrying only data
pub fn data_response<T: Serialize>(status: u16, data: T) -> Envelope<T> {
    Envelope {
        status,
        message: None,
        data: Some(data),
    }
}

/// Helper to create an envelope carrying a message and data
pub fn data_message_response<T: Serialize>(
    status: u16,
    message: impl Into<String>,
    data: T,
) -> Envelope<T> {
    Envelope {
        status,
        message: Some(message.into()),
        data: Some(data),
    }
}

/// Helper to create an envelope carrying only a message
pub fn message_response(status: u16, message: impl Into<String>) -> Envelope<()> {
    Envelope {
        status,
        message: Some(message.into()),
        data: None,
    }
}

/// Endpoint listing served by the welcome route.
#[derive(Debug, Serialize)]
pub struct Endpoints {
    #[serde(rename = "GET /users")]
    pub list: &'static str,
    #[serde(rename = "POST /users")]
    pub create: &'static str,
    #[serde(rename = "GET /users/<id>")]
    pub fetch: &'static str,
    #[serde(rename = "PUT /users/<id>")]
    pub update: &'static str,
    #[serde(rename = "DELETE /users/<id>")]
    pub delete: &'static str,
}

/// Body of the welcome route.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub status: u16,
    pub message: &'static str,
    pub endpoints: Endpoints,
}
