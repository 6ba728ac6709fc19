//! HTTP error mapping.
//!
//! Input problems are 400s, storage problems are 503s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hostname_extraction::ExtractionError;
use serde::Serialize;
use thiserror::Error;

/// Message shown for files that aren't a decodable scanner CSV.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid file format. Please upload a valid CSV file.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no file was uploaded")]
    MissingFile,

    #[error("malformed upload: {0}")]
    Multipart(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Extraction(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            Self::Extraction(ExtractionError::Storage(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Extraction(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::Extraction(ExtractionError::InvalidFormat { reason }) => ErrorResponse {
                error: INVALID_FORMAT_MESSAGE.to_string(),
                detail: Some(reason.clone()),
            },
            Self::Extraction(ExtractionError::Storage(_)) => ErrorResponse {
                error: "Storage unavailable".to_string(),
                detail: None,
            },
            Self::Internal(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                detail: None,
            },
            other => ErrorResponse {
                error: other.to_string(),
                detail: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Upload failed");
        } else {
            tracing::warn!(error = %self, "Upload rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
