use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use medprocure_admin::AdminError;
use medprocure_core::DomainError;
use medprocure_infra::FileStorageError;

pub fn admin_error_to_response(err: AdminError) -> axum::response::Response {
    match err {
        AdminError::Domain(e) => domain_error_to_response(e),
        AdminError::UnknownModel(_) => json_error(StatusCode::NOT_FOUND, "unknown_model", err.to_string()),
        AdminError::UnknownFilter { .. } => json_error(StatusCode::BAD_REQUEST, "unknown_filter", err.to_string()),
        AdminError::Config(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "field": field,
                "message": message,
            })),
        )
            .into_response(),
        DomainError::ReferentialIntegrity { blocked_by, .. } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "protected",
                "message": message,
                "blocked_by": blocked_by,
            })),
        )
            .into_response(),
        DomainError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::UnknownEntity(_) => json_error(StatusCode::NOT_FOUND, "unknown_model", message),
        DomainError::Storage(_) => {
            tracing::error!(error = %message, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
        }
    }
}

pub fn file_error_to_response(err: FileStorageError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        FileStorageError::UnknownNamespace(_) | FileStorageError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        FileStorageError::InvalidName(_) | FileStorageError::Empty | FileStorageError::NotAnImage(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_upload", message)
        }
        FileStorageError::Io(_) => {
            tracing::error!(error = %message, "file storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
