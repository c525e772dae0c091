//! HTTP endpoint implementations for the user resource.

mod home_handlers;
pub mod request_utils;
pub mod response;
mod user_handlers;

pub use home_handlers::home;
pub use request_utils::parse_user_id;
pub use response::{data_message_response, data_response, message_response, Envelope};
pub use user_handlers::{create_user, delete_user, get_user, list_users, update_user};
