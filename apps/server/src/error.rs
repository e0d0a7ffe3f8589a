// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.
//!
//! Every failure from ingestion, prompt building and generation is caught
//! here and converted into a typed JSON response; nothing propagates to the
//! client as an opaque fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use showroom_core::{GenerateError, SessionError};
use showroom_ingest::IngestError;
use thiserror::Error;
use uuid::Uuid;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Generation(#[from] GenerateError),

    #[error("Result superseded by a newer request or reset")]
    Superseded,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            ApiError::Session(err) => match err {
                SessionError::GenerationInFlight => (StatusCode::CONFLICT, "GENERATION_IN_FLIGHT"),
                SessionError::NoRenderAvailable => (StatusCode::CONFLICT, "NO_RENDER_AVAILABLE"),
                SessionError::PageOutOfRange { .. } => {
                    (StatusCode::BAD_REQUEST, "PAGE_OUT_OF_RANGE")
                }
            },
            ApiError::Ingest(err) => match err {
                IngestError::DocumentRead(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_READ_ERROR")
                }
                IngestError::UnsupportedMediaType(_) => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
                }
                IngestError::PageEncode(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "PAGE_ENCODE_ERROR")
                }
            },
            ApiError::Generation(err) => match err {
                GenerateError::Failed { .. } => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"),
                GenerateError::NoImageReturned { .. } => {
                    (StatusCode::BAD_GATEWAY, "NO_IMAGE_RETURNED")
                }
                GenerateError::EmptyResponse => (StatusCode::BAD_GATEWAY, "EMPTY_RESPONSE"),
            },
            ApiError::Superseded => (StatusCode::CONFLICT, "RESULT_SUPERSEDED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_map_to_bad_gateway() {
        let err = ApiError::Generation(GenerateError::EmptyResponse);
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "EMPTY_RESPONSE"));
    }

    #[test]
    fn in_flight_generation_maps_to_conflict() {
        let err = ApiError::Session(SessionError::GenerationInFlight);
        assert_eq!(
            err.status_and_code(),
            (StatusCode::CONFLICT, "GENERATION_IN_FLIGHT")
        );
    }

    #[test]
    fn document_read_maps_to_unprocessable() {
        let err = ApiError::Ingest(IngestError::DocumentRead("corrupt xref".into()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_READ_ERROR")
        );
    }
}
