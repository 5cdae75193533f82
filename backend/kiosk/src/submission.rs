//! # Submission
//!
//! One check-in from the submit tap to the message on screen.
//!
//! ```text
//! idle -> submitting -> success
//!                    -> error
//!                    -> idle (field errors, nothing sent)
//! ```
//!
//! The relay is probed first. Reachable means it is the only channel for
//! this check-in and its answer is final. Unreachable, whether the probe or
//! the delivery itself finds out, means one form post to the public Apps
//! Script URL instead.
use std::time::Duration;

use intake::{CheckInRecord, FieldErrors, validate};
use tracing::{info, warn};

use crate::{
    form::CheckInForm,
    status::FormStatus,
    transport::{DeliveryError, Transport},
};

/// How long the thank-you stays up before the kiosk goes back home.
pub const RETURN_HOME_AFTER: Duration = Duration::from_millis(600);

#[derive(Debug)]
pub enum Outcome {
    Invalid(FieldErrors),
    Sent {
        channel: &'static str,
        return_home_after: Duration,
    },
    Failed(DeliveryError),
}

pub struct Submission<P, F> {
    form: CheckInForm,
    status: FormStatus,
    errors: FieldErrors,
    primary: P,
    fallback: F,
}

impl<P: Transport, F: Transport> Submission<P, F> {
    pub fn new(form: CheckInForm, primary: P, fallback: F) -> Self {
        Self {
            form,
            status: FormStatus::Idle,
            errors: FieldErrors::default(),
            primary,
            fallback,
        }
    }

    pub fn form(&self) -> &CheckInForm {
        &self.form
    }

    /// Editing needs `&mut self`, so inputs are locked while a submit is in flight.
    pub fn form_mut(&mut self) -> &mut CheckInForm {
        &mut self.form
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub async fn submit(&mut self) -> Outcome {
        if self.status.is_busy() {
            // Only a dropped submit future leaves this behind.
            warn!("Previous submission was abandoned mid-flight");
            self.set(FormStatus::Idle);
        }

        self.set(FormStatus::Submitting);
        self.errors = FieldErrors::default();

        let record = match validate(&self.form.to_raw()) {
            Ok(record) => record,
            Err(errors) => {
                info!("Check-in has {} invalid field(s)", errors.fields().count());
                self.errors = errors.clone();
                self.set(FormStatus::Idle);

                return Outcome::Invalid(errors);
            }
        };

        match self.deliver(&record).await {
            Ok(channel) => {
                info!("Check-in sent via {channel}");
                self.form.reset();
                self.set(FormStatus::Success);

                Outcome::Sent {
                    channel,
                    return_home_after: RETURN_HOME_AFTER,
                }
            }
            Err(e) => {
                warn!("Check-in not sent: {e}");
                self.set(FormStatus::Error);

                Outcome::Failed(e)
            }
        }
    }

    async fn deliver(&self, record: &CheckInRecord) -> Result<&'static str, DeliveryError> {
        if self.primary.reachable().await {
            match self.primary.deliver(record).await {
                Ok(()) => return Ok(self.primary.name()),
                Err(e) if e.is_unreachable() => {
                    warn!("{e}, falling back to {}", self.fallback.name());
                }
                Err(e) => return Err(e),
            }
        } else {
            warn!(
                "{} unreachable, falling back to {}",
                self.primary.name(),
                self.fallback.name()
            );
        }

        self.fallback
            .deliver(record)
            .await
            .map(|()| self.fallback.name())
    }

    fn set(&mut self, next: FormStatus) {
        if let Err(e) = self.status.move_to(next) {
            warn!("{e}");
            self.status = next;
        }
    }
}
