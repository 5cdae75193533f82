use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    New,
    Existing,
    Walkin,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::New, Kind::Existing, Kind::Walkin];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::New => "new",
            Kind::Existing => "existing",
            Kind::Walkin => "walkin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Kind::New => "New Patients",
            Kind::Existing => "Patients",
            Kind::Walkin => "Walk-Ins",
        }
    }

    /// Preselection from a `?kind=` style parameter, case insensitive.
    pub fn from_query(value: &str) -> Option<Self> {
        value.trim().to_lowercase().parse().ok()
    }
}

impl FromStr for Kind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Scheduled,
    General,
    Membership,
    Pharma,
    Other,
}

impl Reason {
    pub const ALL: [Reason; 5] = [
        Reason::Scheduled,
        Reason::General,
        Reason::Membership,
        Reason::Pharma,
        Reason::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Scheduled => "scheduled",
            Reason::General => "general",
            Reason::Membership => "membership",
            Reason::Pharma => "pharma",
            Reason::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Reason::Scheduled => "Scheduled Appointment",
            Reason::General => "General Question",
            Reason::Membership => "Question on Membership",
            Reason::Pharma => "Pharmaceutical Representative",
            Reason::Other => "Other",
        }
    }
}

impl FromStr for Reason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reason::ALL
            .into_iter()
            .find(|reason| reason.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped submission as it arrives, before the schema has looked at it.
///
/// Every field is kept as raw JSON so a wrong type ends up as a field error
/// instead of a decode failure for the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCheckIn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_reason: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
}

impl RawCheckIn {
    pub fn get(&self, field: Field) -> Option<&Value> {
        match field {
            Field::Kind => self.kind.as_ref(),
            Field::Name => self.name.as_ref(),
            Field::Phone => self.phone.as_ref(),
            Field::Reason => self.reason.as_ref(),
            Field::OtherReason => self.other_reason.as_ref(),
            Field::ProductName => self.product_name.as_ref(),
            Field::Notes => self.notes.as_ref(),
            Field::Company => self.company.as_ref(),
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) -> &mut Self {
        let value = Some(Value::String(value.into()));

        match field {
            Field::Kind => self.kind = value,
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Reason => self.reason = value,
            Field::OtherReason => self.other_reason = value,
            Field::ProductName => self.product_name = value,
            Field::Notes => self.notes = value,
            Field::Company => self.company = value,
        }

        self
    }

    /// A human never sees the `company` input, so any text in it means a bot.
    pub fn honeypot_tripped(&self) -> bool {
        matches!(&self.company, Some(Value::String(s)) if !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub kind: Kind,
    pub name: String,
    pub phone: String,
    pub reason: Reason,
    pub other_reason: String,
    pub product_name: String,
    pub notes: String,
    pub company: String,
}

/// What the intake sheet receives. The honeypot never leaves this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload<'a> {
    pub kind: Kind,
    pub reason: Reason,
    pub name: &'a str,
    pub phone: &'a str,
    pub other_reason: &'a str,
    pub product_name: &'a str,
    pub notes: &'a str,
}

impl CheckInRecord {
    pub fn intake_payload(&self) -> IntakePayload<'_> {
        IntakePayload {
            kind: self.kind,
            reason: self.reason,
            name: &self.name,
            phone: &self.phone,
            other_reason: &self.other_reason,
            product_name: &self.product_name,
            notes: &self.notes,
        }
    }

    /// Same subset as [`CheckInRecord::intake_payload`], flattened for a form post.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("kind", self.kind.to_string()),
            ("reason", self.reason.to_string()),
            ("name", self.name.clone()),
            ("phone", self.phone.clone()),
            ("otherReason", self.other_reason.clone()),
            ("productName", self.product_name.clone()),
            ("notes", self.notes.clone()),
        ]
    }
}
