//! # Upstream
//!
//! The intake sheet is an Apps Script web app and it is the system of record.
//! Nothing is stored here, every accepted check-in is one POST to the script.
//!
//! The script answers in one of two ways:
//! - JSON, optionally carrying `"ok": false` when it refused the row
//! - Plain text, which only happens on success in practice
//!
//! One attempt per check-in. No retries and no timeout beyond the client
//! default.
use async_trait::async_trait;
use axum::http::StatusCode;
use intake::IntakePayload;
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::debug;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

#[async_trait]
pub trait Upstream: Send + Sync {
    async fn forward(&self, payload: &IntakePayload<'_>) -> Result<UpstreamReply, BoxError>;
}

pub struct AppsScript {
    client: Client,
    url: String,
}

impl AppsScript {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Upstream for AppsScript {
    async fn forward(&self, payload: &IntakePayload<'_>) -> Result<UpstreamReply, BoxError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!("Apps Script answered {status}");

        Ok(UpstreamReply { status, body })
    }
}
