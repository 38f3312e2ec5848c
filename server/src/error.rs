use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use studymate_flows::FlowError;
use studymate_store::StoreError;

/// The one message end users see for any remote or internal failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Error type for the HTTP action layer.
///
/// Local validation problems keep their safe field message; everything else
/// is collapsed to a generic notice with the diagnostic logged server-side.
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    Unauthorized,
    NotFound,
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InputInvalid(message) => ApiError::InvalidInput(message),
            other => {
                error!(error = %other, "Flow invocation failed");
                ApiError::Internal
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Validation(message) => ApiError::InvalidInput(message),
            other => {
                error!(error = %other, "Store operation failed");
                ApiError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studymate_core::errors::GeminiError;

    #[test]
    fn input_invalid_keeps_its_safe_message() {
        let api: ApiError = FlowError::InputInvalid("subject is required".to_string()).into();
        assert!(matches!(api, ApiError::InvalidInput(m) if m == "subject is required"));
    }

    #[test]
    fn remote_failures_collapse_to_internal() {
        let generation: ApiError = FlowError::Generation("bad payload".to_string()).into();
        assert!(matches!(generation, ApiError::Internal));

        let transport: ApiError =
            FlowError::Transport(GeminiError::Request("timeout".to_string())).into();
        assert!(matches!(transport, ApiError::Internal));
    }

    #[test]
    fn store_errors_map_to_api_statuses() {
        let not_found: ApiError = StoreError::NotFound("task-1".to_string()).into();
        assert!(matches!(not_found, ApiError::NotFound));

        let validation: ApiError = StoreError::Validation("Title is required".to_string()).into();
        assert!(matches!(validation, ApiError::InvalidInput(_)));

        let storage: ApiError = StoreError::Storage("lock".to_string()).into();
        assert!(matches!(storage, ApiError::Internal));
    }
}
