use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shop_core::{DomainError, ValidationErrors};
use shop_infra::StoreError;

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

/// `400` with the per-field messages under `fields`.
pub fn validation_error(errors: ValidationErrors) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": errors.to_string(),
            "fields": errors,
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(errors) => validation_error(errors),
        err @ DomainError::NotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        // Ids only ever come from the path, where a malformed id matches nothing.
        DomainError::InvalidId { resource, raw } => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{resource} {raw} not found"),
        ),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        other => {
            tracing::error!(error = %other, "catalog store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal server error",
            )
        }
    }
}

/// Malformed or non-JSON request bodies are validation failures.
pub fn body_rejection(rejection: JsonRejection) -> axum::response::Response {
    let mut errors = ValidationErrors::new();
    errors.add("non_field_errors", rejection.body_text());
    validation_error(errors)
}
