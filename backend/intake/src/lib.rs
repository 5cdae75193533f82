//! # Intake
//!
//! The check-in record and the schema that guards it.
//!
//! Both sides of a submission link against this crate: the kiosk validates
//! before it touches the network and the relay validates again before it
//! forwards anything upstream. Same code, same messages, so a record the
//! kiosk accepts is a record the relay accepts.
//!
//!
//!
//! ## Record
//! - kind: **new** | **existing** | **walkin**
//! - name: at least 2 characters
//! - phone: digits, spaces and `+().-`, 7 to 20 characters
//! - reason: **scheduled** | **general** | **membership** | **pharma** | **other**
//! - otherReason: up to 200 characters, required when reason is **other**
//! - productName: up to 200 characters, required when reason is **pharma**
//! - notes: up to 500 characters
//! - company: honeypot, must stay empty
//!
//!
//!
//! ## Errors
//! One message per field, the first rule that field broke. Serialized as
//! `{"formErrors": [], "fieldErrors": {"name": "Please enter a full name"}}`.
pub mod record;
pub mod validate;

pub use record::{CheckInRecord, IntakePayload, Kind, RawCheckIn, Reason};
pub use validate::{Field, FieldErrors, validate, validate_value};
