//! Rendering of domain [`Error`]s as HTTP responses.
//!
//! Every failure leaves as `{"error","code","details"?,"trace_id"?}` with the
//! status implied by its [`ErrorCode`]. Server-side failures are logged here
//! and reach the client without their internal message or details.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorBody, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const INTERNAL_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing body for `error`.
fn public_body(error: &Error) -> ErrorBody {
    let mut body = ErrorBody::from(error.clone());
    match error.code() {
        ErrorCode::InternalError => {
            body.error = INTERNAL_MESSAGE.to_owned();
            body.details = None;
        }
        ErrorCode::ServiceUnavailable => body.details = None,
        _ => {}
    }
    body
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let trace_id = self.trace_id().unwrap_or("-");
        match self.code() {
            ErrorCode::InternalError => {
                error!(trace_id, message = %self.message(), "request failed");
            }
            ErrorCode::ServiceUnavailable => {
                warn!(trace_id, message = %self.message(), "dependency unavailable");
            }
            _ => {}
        }

        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "unhandled actix error");
        Self::internal(INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
