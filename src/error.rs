use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or empty required input
    #[error("{0}")]
    Validation(String),

    /// Genius, the lyrics page or Gemini failed (status or network)
    #[error("{0}")]
    Upstream(String),

    /// Model reply was not valid JSON after fence stripping
    #[error("Invalid analysis response: {0}")]
    Parse(String),

    /// Unknown song id; answered like any other upstream failure
    #[error("{0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Upstream(_) | Error::Parse(_) | Error::NotFound(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Upstream(format!("Request timed out: {}", e))
        } else {
            Error::Upstream(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

// Every endpoint answers failures as `{ "error": message }`
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
