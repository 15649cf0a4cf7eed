use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use goldapi_core::domain::product::ProductKey;
use goldapi_core::validation::{FieldIssue, ValidationError};
use goldapi_db::RepositoryError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No product found with product_key: {0}")]
    ProductNotFound(ProductKey),
    #[error("No customers found for segment: {0}")]
    NoCustomersInSegment(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("The requested URL was not found on the server.")]
    RouteNotFound,
    #[error("The method is not allowed for the requested URL.")]
    MethodNotAllowed,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Generic `{"error": <category>, "message": <detail>}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ProductNotFound(_) | Self::NoCustomersInSegment(_) | Self::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn category(&self) -> &'static str {
        match self.status_code() {
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::METHOD_NOT_ALLOWED => "Method Not Allowed",
            StatusCode::PAYLOAD_TOO_LARGE => "Payload Too Large",
            _ => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.category();
        let message = self.to_string();

        let fields = match self {
            // Segment misses answer with a bare message, not the envelope.
            Self::NoCustomersInSegment(_) => {
                return (status, Json(MessageBody { message })).into_response();
            }
            Self::Repository(source) => {
                error!(
                    event_name = "api.database_error",
                    error = %source,
                    "database statement failed"
                );
                Vec::new()
            }
            Self::Validation(validation) => validation.issues,
            _ => Vec::new(),
        };

        (status, Json(ErrorBody { error, message, fields })).into_response()
    }
}
