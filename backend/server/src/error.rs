use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intake::FieldErrors;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::{config::UPSTREAM_KEY, routes::Reply};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing APPS_SCRIPT_URL")]
    MissingUpstream,

    #[error("Malformed payload")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("GAS error")]
    UpstreamStatus(String),

    #[error("GAS returned failure")]
    UpstreamRejected(Value),

    #[error("Unexpected error")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedPayload { .. } | RelayError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            RelayError::UpstreamStatus { .. } | RelayError::UpstreamRejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
            RelayError::MissingUpstream | RelayError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Value {
        match self {
            RelayError::MissingUpstream => {
                Value::String(format!("{UPSTREAM_KEY} is not configured on the relay"))
            }
            RelayError::MalformedPayload(e) => Value::String(e.to_string()),
            RelayError::Validation(errors) => {
                serde_json::to_value(errors).unwrap_or_else(|_| Value::String(errors.to_string()))
            }
            RelayError::UpstreamStatus(body) => Value::String(body.clone()),
            RelayError::UpstreamRejected(reply) => reply.clone(),
            RelayError::InternalError(e) => Value::String(e.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = self.details();

        if status.is_server_error() {
            error!("POST /checkin failed with {status}: {self}: {details}");
        } else {
            warn!("POST /checkin rejected with {status}: {self}");
        }

        (status, Json(Reply::failure(self.to_string(), details))).into_response()
    }
}
