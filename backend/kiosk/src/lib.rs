//! # Kiosk
//!
//! The check-in form as it runs on the front desk tablet: entered values,
//! local validation with the shared [`intake`] schema, and delivery.
//!
//! ## Tabs
//! - New Patients (`?kind=new`, default)
//! - Patients (`?kind=existing`)
//! - Walk-Ins (`?kind=walkin`)
//!
//! ## Configuration
//! - `KIOSK_RELAY_URL`: the relay's `/checkin`, defaults to `http://localhost:1111/checkin`
//! - `GAS_PUBLIC_URL`: public Apps Script URL for the fallback form post
//!
//! Only two outcomes reach the screen: the thank-you or the front desk
//! message. Field errors show under their inputs.
pub mod form;
pub mod status;
pub mod submission;
pub mod transport;

pub use form::CheckInForm;
pub use status::FormStatus;
pub use submission::{Outcome, Submission};
pub use transport::{DeliveryError, FormPostTransport, RelayTransport, Transport};
