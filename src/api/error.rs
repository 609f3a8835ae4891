use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ApiError;
use crate::repositories::RepositoryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    #[error("User not found")]
    NotFound,
    #[error("Route not found")]
    RouteNotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Storage error: {0}")]
    Storage(RepositoryError),
    #[error("Handler panicked: {0}")]
    Panic(String),
}

/// Error text attached to a failed response for the request logger.
#[derive(Debug, Clone)]
pub struct RequestFailure(pub String);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Storage(_) | AppError::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "Invalid input",
            AppError::ValidationFailed(_) => "Validation failed",
            AppError::NotFound => "User not found",
            AppError::RouteNotFound => "Not found",
            AppError::MethodNotAllowed => "Method not allowed",
            AppError::Storage(_) | AppError::Panic(_) => "Internal server error",
        }
    }

    /// Client-facing explanation. Server-side failures never expose one.
    pub fn details(&self) -> Option<&str> {
        match self {
            AppError::InvalidInput(details) | AppError::ValidationFailed(details) => {
                Some(details.as_str())
            }
            _ => None,
        }
    }

    pub fn body(&self) -> ApiError {
        let body = ApiError::new(self.status_code().as_u16(), self.message());
        match self.details() {
            Some(details) => body.with_details(details),
            None => body,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            other => AppError::Storage(other),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationFailed(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let mut response = (status, Json(self.body())).into_response();
        response
            .extensions_mut()
            .insert(RequestFailure(self.to_string()));
        response
    }
}
