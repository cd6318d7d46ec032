//! Error types for the JurisMatch server

use audit_engine::AuditError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Não foi possível ler o PDF: {0}")]
    InvalidPdf(String),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::InvalidPdf(_) => (StatusCode::BAD_REQUEST, "INVALID_PDF"),
            ServerError::Audit(AuditError::MissingCredential) => {
                (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL")
            }
            ServerError::Audit(AuditError::MissingContractText) => {
                (StatusCode::BAD_REQUEST, "MISSING_CONTRACT_TEXT")
            }
            ServerError::Audit(AuditError::AuditRequestFailure(_)) => {
                (StatusCode::BAD_GATEWAY, "AUDIT_REQUEST_FAILED")
            }
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
