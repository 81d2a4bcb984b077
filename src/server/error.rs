//! HTTP mapping for library errors.

use crate::error::ScriptwrightError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body, `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ScriptwrightError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScriptwrightError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScriptwrightError::Upstream(_)
            | ScriptwrightError::Transcript(_)
            | ScriptwrightError::Http(_) => StatusCode::BAD_GATEWAY,
            ScriptwrightError::MissingCredential(_)
            | ScriptwrightError::Agent(_)
            | ScriptwrightError::Config(_)
            | ScriptwrightError::Io(_)
            | ScriptwrightError::Json(_)
            | ScriptwrightError::TomlParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScriptwrightError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ScriptwrightError::InvalidInput("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ScriptwrightError::MissingCredential("YOUTUBE_API_KEY".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ScriptwrightError::Agent("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ScriptwrightError::Upstream("quota".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_missing_credential_message() {
        let error = ScriptwrightError::MissingCredential("YOUTUBE_API_KEY".into());
        assert_eq!(error.to_string(), "YOUTUBE_API_KEY is not configured");
    }
}
