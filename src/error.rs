use crate::models::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const MISSING_COUNTRY: &str = "Missing country in request body.";

/// Outcome of a single upstream call that did not succeed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse upstream response: {0}")]
    Parse(String),

    #[error("malformed upstream response: {0}")]
    Malformed(&'static str),

    #[error("upstream reported an error: {}", .0.as_deref().unwrap_or("<no message>"))]
    Reported(Option<String>),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        // The news key travels in the query string, keep URLs out of error text.
        let e = e.without_url();
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if e.is_decode() {
            UpstreamError::Parse(e.to_string())
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// Client-facing error. Serialized as `{ "error": message }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_country() -> Self {
        ApiError::BadRequest(MISSING_COUNTRY.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
