//! Error types for TutorIT

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::routes::ApiResponse;
use crate::auth::TokenError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("An account with email '{0}' already exists")]
    DuplicateAccount(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Config file not found. Run 'tutorit init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// HTTP status this error maps to when it reaches a handler boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateAccount(_) => StatusCode::CONFLICT,
            Error::Token(e) if e.is_invalid_token() => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::warn!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            StatusCode::UNAUTHORIZED => "Unauthorized".to_string(),
            _ => self.to_string(),
        };
        (status, Json(ApiResponse::err(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
