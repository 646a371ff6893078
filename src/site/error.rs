//! Site error types and response handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors that end a request without a rendered page
#[derive(Debug)]
pub enum SiteError {
    /// Unknown post or malformed target; body is the message
    NotFound(String),
    BadRequest(String),
    /// Repository or render task failure. The page is never partially sent.
    Repository(anyhow::Error),
}

impl From<anyhow::Error> for SiteError {
    fn from(err: anyhow::Error) -> Self {
        SiteError::Repository(err)
    }
}

impl From<tokio::task::JoinError> for SiteError {
    fn from(err: tokio::task::JoinError) -> Self {
        SiteError::Repository(anyhow::anyhow!("render task failed: {}", err))
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SiteError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            SiteError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            SiteError::Repository(err) => {
                tracing::error!("Repository error: {:#}", err);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response();
            }
        };

        tracing::error!("Site error: {} - {}", status, message);

        (status, message).into_response()
    }
}
