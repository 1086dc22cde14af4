//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use fieldhub_domain::error::{FieldHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned by handlers and extractors.
#[derive(Debug)]
pub enum ApiError {
    /// Failure reported by the domain or application layer.
    Domain(FieldHubError),
    /// The gateway did not identify the caller.
    Unauthenticated(String),
}

impl ApiError {
    /// Reject a path or query value that does not parse.
    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        Self::Domain(
            ValidationError::InvalidValue {
                field,
                value: value.to_string(),
            }
            .into(),
        )
    }
}

impl From<FieldHubError> for ApiError {
    fn from(err: FieldHubError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthenticated(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            Self::Domain(err) => match err {
                FieldHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
                FieldHubError::InvalidTransition(err) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                FieldHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
                FieldHubError::CannotDelete(err) => (StatusCode::BAD_REQUEST, err.to_string()),
                FieldHubError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
                FieldHubError::Forbidden(err) => (StatusCode::FORBIDDEN, err.to_string()),
                FieldHubError::Storage(err) => {
                    tracing::error!(error = %err, "storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
