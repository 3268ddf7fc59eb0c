//! The JSON envelope returned by the spots API, and the error type that
//! renders into it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::catalog::CatalogError;

#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub response: Option<T>,
}

fn status_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::CREATED => "Created",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::SERVICE_UNAVAILABLE => "Service Unavailable",
        _ => "Error",
    }
}

pub fn envelope<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    response: Option<T>,
) -> Response {
    let body = Envelope {
        status: status_label(status),
        message: message.into(),
        response,
    };
    (status, Json(body)).into_response()
}

pub fn ok<T: Serialize>(message: impl Into<String>, response: T) -> Response {
    envelope(StatusCode::OK, message, Some(response))
}

pub fn created<T: Serialize>(message: impl Into<String>, response: T) -> Response {
    envelope(StatusCode::CREATED, message, Some(response))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Login required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("Storage is currently unavailable")]
    StorageUnavailable,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CatalogError::InvalidQuery(e) => ApiError::BadRequest(e.to_string()),
            CatalogError::Conflict(_) => ApiError::Conflict(err.to_string()),
            // already logged by the catalog
            CatalogError::Storage(_) => ApiError::StorageUnavailable,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status != StatusCode::SERVICE_UNAVAILABLE {
            warn!("Request rejected with {}: {}", status, self);
        }
        envelope::<()>(status, self.to_string(), None)
    }
}

pub type ApiResult = Result<Response, ApiError>;
