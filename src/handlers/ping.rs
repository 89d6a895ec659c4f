use axum::{http::StatusCode, response::Response};
use crate::error::json_response;
use crate::models::Message;

pub const PING_REPLY: &str = "Hi, how can I help you?";

// Downstream handler behind the admission middleware
pub async fn ping_handler() -> Response {
    json_response(StatusCode::OK, &Message::successful(PING_REPLY))
}
