use std::sync::Arc;

use axum::{Json, body::Bytes, extract};
use intake::{RawCheckIn, validate_value};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{error::RelayError, state::State, utils::interpret_reply};

/// Body of every `/checkin` response, success or not.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Reply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn with_result(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn failure(error: String, details: Value) -> Self {
        Self {
            ok: false,
            error: Some(error),
            details: Some(details),
            result: None,
        }
    }
}

pub async fn checkin_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Result<Json<Reply>, RelayError> {
    let upstream = state.upstream.as_ref().ok_or(RelayError::MissingUpstream)?;

    let payload: Value = serde_json::from_slice(&body)?;
    let checked = validate_value(&payload);

    // The schema rejects a filled honeypot too, bots get a quiet success instead.
    let raw: Option<RawCheckIn> = serde_json::from_value(payload).ok();
    if raw.as_ref().is_some_and(RawCheckIn::honeypot_tripped) {
        info!("Honeypot filled, dropping check-in");
        return Ok(Json(Reply::ok()));
    }

    let record = checked.map_err(RelayError::Validation)?;

    info!("Forwarding {} check-in ({})", record.kind, record.reason);
    let reply = upstream.forward(&record.intake_payload()).await?;

    Ok(Json(Reply::with_result(interpret_reply(reply)?)))
}
