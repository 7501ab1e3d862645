use std::io::Error as IoError;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Fatal startup errors for the server binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error("Configuration error: {0}")]
    Config(#[from] upwatch::config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),
    #[error("Connection pool error: {0}")]
    PoolBuild(#[from] deadpool::managed::BuildError),
    #[error("{0}")]
    Core(#[from] upwatch::Error),
}

impl From<deadpool::managed::PoolError<libsql::Error>> for AppError {
    fn from(err: deadpool::managed::PoolError<libsql::Error>) -> Self {
        AppError::Core(err.into())
    }
}

/// Per-request errors, rendered as a JSON body with a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("target not found")]
    NotFound,
    /// The display form is deliberately generic; the source is logged, not
    /// leaked to the client.
    #[error("internal error")]
    Internal(#[source] upwatch::Error),
}

impl From<upwatch::Error> for ApiError {
    fn from(err: upwatch::Error) -> Self {
        match err {
            upwatch::Error::Input(message) => ApiError::BadRequest(message),
            upwatch::Error::StaleTarget(_) => ApiError::NotFound,
            other => ApiError::Internal(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(source) = self {
            tracing::error!("request failed: {source}");
        }

        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
