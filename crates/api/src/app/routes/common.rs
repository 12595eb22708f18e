use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use shop_core::DomainError;

use crate::app::errors;

/// The operations every catalog resource exposes, one handler each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Fetch,
    Update,
    Delete,
}

impl Operation {
    /// Status code of a successful response.
    pub fn success_status(self) -> StatusCode {
        match self {
            Operation::Create => StatusCode::CREATED,
            Operation::Delete => StatusCode::NO_CONTENT,
            Operation::List | Operation::Fetch | Operation::Update => StatusCode::OK,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Fetch => "fetch",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Successful response for `op`; `Delete` never carries a body.
pub fn respond(op: Operation, body: impl IntoResponse) -> Response {
    match op {
        Operation::Delete => op.success_status().into_response(),
        _ => (op.success_status(), body).into_response(),
    }
}

/// Logs a completed write.
pub fn record_write(resource: &'static str, op: Operation, id: i64) {
    tracing::info!(resource, operation = op.as_str(), id, "catalog write");
}

/// Parses a path id; anything that is not a positive integer matches no record.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(errors::domain_error_to_response)
}
