//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lendbox_domain::error::LendBoxError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`LendBoxError`] to an HTTP response with appropriate status code.
pub struct ApiError(LendBoxError);

impl From<LendBoxError> for ApiError {
    fn from(err: LendBoxError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            LendBoxError::Validation(_) => StatusCode::BAD_REQUEST,
            LendBoxError::NotFound(_) => StatusCode::NOT_FOUND,
            LendBoxError::Conflict(_) => StatusCode::CONFLICT,
            LendBoxError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            LendBoxError::Validation(err) => err.to_string(),
            LendBoxError::NotFound(err) => err.to_string(),
            LendBoxError::Conflict(err) => err.to_string(),
            LendBoxError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
