//! Gateway error types

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::Message;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Try again later.";

#[derive(Debug, Error)]
pub enum GatewayError {
    // peer address missing or not host:port
    #[error("unable to resolve client identity from {0:?}")]
    ClientIdentityUnresolvable(String),

    #[error("rate limit exceeded for client {0}")]
    RateLimitExceeded(String),

    #[error("failed to encode response: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("failed to render metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::ClientIdentityUnresolvable(addr) => {
                tracing::warn!(peer = %addr, "unable to parse client IP");
                (StatusCode::INTERNAL_SERVER_ERROR, "Unable to parse IP").into_response()
            }
            GatewayError::RateLimitExceeded(_) => {
                json_response(StatusCode::TOO_MANY_REQUESTS, &Message::failed(RATE_LIMIT_MESSAGE))
            }
            GatewayError::Encoding(e) => {
                tracing::error!(error = %e, "error encoding response");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error encoding response").into_response()
            }
            GatewayError::Metrics(e) => {
                tracing::error!(error = %e, "error rendering metrics");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering metrics").into_response()
            }
        }
    }
}

// Serialize `message` by hand so an encoding failure becomes a logged 500
pub fn json_response(status: StatusCode, message: &Message) -> Response {
    match serde_json::to_vec(message) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => GatewayError::Encoding(e).into_response(),
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
