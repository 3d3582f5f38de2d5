//! Structured error responses.
//!
//! Every failure leaves the service as `{"success": false, "error": "..."}`
//! with a status code that separates caller mistakes from upstream trouble.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::tracer::{QueryError, TraceError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway(String),
    GatewayTimeout(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::BadGateway(msg) | ApiError::GatewayTimeout(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "success": false, "error": self.message() });
        (status, Json(body)).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<TraceError> for ApiError {
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::Provider { .. } => ApiError::BadGateway(err.to_string()),
            TraceError::DeadlineExceeded { .. } => ApiError::GatewayTimeout(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
