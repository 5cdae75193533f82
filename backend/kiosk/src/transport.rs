//! # Delivery Channels
//!
//! Two ways out of the kiosk:
//! - **Relay**: JSON POST to our own `/checkin`, the normal path
//! - **Form post**: urlencoded POST straight to the public Apps Script URL,
//!   fire and forget, the way a hidden frame submits a form
//!
//! The form post only exists for networks that cannot reach the relay at all.
//! A relay that answers with an error was reached, so it is never a reason to
//! fall back. See [`crate::submission`].
use std::error::Error as StdError;

use async_trait::async_trait;
use intake::CheckInRecord;
use reqwest::{Client, Method, StatusCode};
use thiserror::Error;
use tracing::debug;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("{channel} unreachable: {source}")]
    Unreachable {
        channel: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{channel} answered {status}")]
    Rejected {
        channel: &'static str,
        status: StatusCode,
    },
}

impl DeliveryError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DeliveryError::Unreachable { .. })
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Probes whether anything answers on this channel.
    async fn reachable(&self) -> bool {
        true
    }

    async fn deliver(&self, record: &CheckInRecord) -> Result<(), DeliveryError>;
}

pub struct RelayTransport {
    client: Client,
    url: String,
}

impl RelayTransport {
    pub const NAME: &'static str = "relay";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Transport for RelayTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    // Any HTTP answer counts, even an error status.
    async fn reachable(&self) -> bool {
        match self.client.request(Method::OPTIONS, &self.url).send().await {
            Ok(response) => {
                debug!("Relay probe answered {}", response.status());
                true
            }
            Err(e) => {
                debug!("Relay probe failed: {e}");
                false
            }
        }
    }

    async fn deliver(&self, record: &CheckInRecord) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable {
                channel: Self::NAME,
                source: e.into(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                channel: Self::NAME,
                status,
            });
        }

        Ok(())
    }
}

pub struct FormPostTransport {
    client: Client,
    url: String,
}

impl FormPostTransport {
    pub const NAME: &'static str = "form post";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Transport for FormPostTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    // The answer is opaque to a hidden frame, so the status is not inspected.
    async fn deliver(&self, record: &CheckInRecord) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .form(&record.form_fields())
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable {
                channel: Self::NAME,
                source: e.into(),
            })?;

        debug!("Form post answered {}", response.status());

        Ok(())
    }
}
