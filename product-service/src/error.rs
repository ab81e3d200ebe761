use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error has occurred";

/// Failures raised by a [`ProductStore`](crate::services::ProductStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encoding(#[from] mongodb::bson::ser::Error),

    #[error("Failed to decode document: {0}")]
    Decoding(String),

    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Stable codes reported in 500 bodies, one per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ListProducts,
    CreateProduct,
    FetchProduct,
    DeleteProduct,
    UpdateProduct,
    Unhandled,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ListProducts => "ERR_6778",
            ErrorCode::CreateProduct | ErrorCode::FetchProduct => "ERR_6779",
            ErrorCode::DeleteProduct => "ERR_6780",
            ErrorCode::UpdateProduct => "ERR_6781",
            ErrorCode::Unhandled => "ERR_6700",
        }
    }
}

/// Every way a request can fail, and the one place each becomes a response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The name is too long")]
    NameTooLong,

    #[error("Please provide a valid product id")]
    MissingId,

    #[error("Product with id: {0} cannot be found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{code:?} failed: {source}")]
    Internal {
        code: ErrorCode,
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Adapter for `map_err`: wraps any failure as an internal error
    /// reported under `code`.
    pub fn internal<E>(code: ErrorCode) -> impl FnOnce(E) -> ApiError
    where
        E: Into<anyhow::Error>,
    {
        move |err| ApiError::Internal {
            code,
            source: err.into(),
        }
    }
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct InternalErrorBody {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NameTooLong | ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                Json(MessageBody {
                    message: self.to_string(),
                }),
            )
                .into_response(),
            ApiError::MissingId => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ApiError::Internal { code, source } => {
                tracing::error!(code = code.as_str(), error = ?source, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(InternalErrorBody {
                        code: code.as_str(),
                        message: INTERNAL_ERROR_MESSAGE,
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Response for a handler that panicked, installed with `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal {
        code: ErrorCode::Unhandled,
        source: anyhow::anyhow!("Handler panicked: {}", detail),
    }
    .into_response()
}
