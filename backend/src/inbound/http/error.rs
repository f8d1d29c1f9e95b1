//! HTTP adapter mapping for domain errors.
//!
//! The domain [`Error`] stays HTTP-agnostic; this module turns it, and the
//! persistence failures reported by repository ports, into JSON responses
//! with consistent status codes.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::ports::ResourcePersistenceError;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Map a repository failure to a client-facing error.
///
/// Reference and uniqueness violations are the client's fault and carry the
/// offending field; connection failures become 503 and anything else a
/// redacted 500.
pub(crate) fn persistence_error(err: ResourcePersistenceError) -> Error {
    match err {
        ResourcePersistenceError::UnknownReference { field, id } => {
            Error::invalid_request(format!("{field}: no record with id {id}"))
                .with_details(json!({"field": field, "code": "does_not_exist", "value": id}))
        }
        ResourcePersistenceError::Conflict { field } => {
            Error::invalid_request(format!("{field} is already taken"))
                .with_details(json!({"field": field, "code": "unique"}))
        }
        ResourcePersistenceError::Connection { message } => {
            error!(%message, "persistence store unreachable");
            Error::service_unavailable("persistence store unavailable")
        }
        ResourcePersistenceError::Query { message } => {
            error!(%message, "persistence query failed");
            Error::internal(message)
        }
    }
}

/// Body that is not JSON, or not an object of the expected shape.
pub(crate) fn malformed_body(err: &dyn std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request body: {err}"))
        .with_details(json!({"field": "body", "code": "malformed_body"}))
}

/// Body key whose value has the wrong JSON type.
pub(crate) fn invalid_type(field: &str, err: &serde_json::Error) -> Error {
    Error::invalid_request(format!("{field}: {err}"))
        .with_details(json!({"field": field, "code": "invalid_type"}))
}

/// `JsonConfig` error handler reporting unreadable bodies as 400.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed_body(&err).into()
}
