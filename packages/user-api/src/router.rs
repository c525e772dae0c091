//! Matchit routing configuration.

use std::fmt::Display;
use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use matchit::Router as MatchitRouter;

use crate::config::ApiConfig;
use crate::handlers;
use user_store::UserStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// User storage layer
    pub store: Arc<UserStore>,
    /// Request handling configuration
    pub config: Arc<ApiConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with default routes.
    pub fn new(store: Arc<UserStore>, config: Arc<ApiConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/", RouteHandler::Home)
            .expect("Failed to insert / route");
        router
            .insert("/users", RouteHandler::Users)
            .expect("Failed to insert /users route");
        router
            .insert("/users/{id}", RouteHandler::User)
            .expect("Failed to insert /users/{id} route");

        Self {
            inner: router,
            state: AppState { store, config },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// Every outcome, including routing and handler failures, becomes a JSON
    /// envelope response.
    pub async fn route<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body,
        B::Error: Display,
    {
        let path = req.uri().path().to_string();
        let method = req.method().clone();
        tracing::debug!("{} {}", method, path);

        let result = match self.inner.at(&path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(req, &path, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::NotFound(no_route_message(&path))),
        };

        match result {
            Ok(response) => response,
            Err(err) => {
                if let RouterError::InternalError(msg) = &err {
                    tracing::error!("{} {} failed: {}", method, path, msg);
                }
                Response::from(err)
            }
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Home,
    Users,
    User,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle<B>(
        &self,
        req: Request<B>,
        path: &str,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Display,
    {
        match self {
            RouteHandler::Home => {
                if req.method() == Method::GET {
                    handlers::home()
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Users => {
                if req.method() == Method::GET {
                    handlers::list_users(state).await
                } else if req.method() == Method::POST {
                    handlers::create_user(req, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::User => {
                // Non-numeric ids do not match the route at all
                let id = params
                    .get("id")
                    .and_then(handlers::parse_user_id)
                    .ok_or_else(|| RouterError::NotFound(no_route_message(path)))?;

                if req.method() == Method::GET {
                    handlers::get_user(id, state).await
                } else if req.method() == Method::PUT {
                    handlers::update_user(req, id, state).await
                } else if req.method() == Method::DELETE {
                    handlers::delete_user(id, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

fn no_route_message(path: &str) -> String {
    format!("No route found for {}", path)
}

/// Router error type.
#[derive(Debug, PartialEq, Eq)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RouterError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::Timeout => StatusCode::REQUEST_TIMEOUT,
            RouterError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RouterError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message placed in the response envelope.
    pub fn message(&self) -> &str {
        match self {
            RouterError::MethodNotAllowed => "Method Not Allowed",
            RouterError::InternalError(_) => "Internal Server Error",
            RouterError::Timeout => "Request Timeout",
            RouterError::BadRequest(msg) | RouterError::NotFound(msg) => msg.as_str(),
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let envelope = handlers::message_response(status.as_u16(), err.message());
        // Serializing a status code and a string cannot fail in practice
        let body = serde_json::to_vec(&envelope).unwrap_or_else(|_| {
            format!("{{\"status\":{}}}", status.as_u16()).into_bytes()
        });

        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
