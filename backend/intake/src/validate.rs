//! # Schema
//!
//! Base rules run field by field first. Cross-field rules run after, and
//! only land on a field that is still clean, so every field reports the
//! first rule it broke and nothing more.
use std::{
    collections::{BTreeMap, btree_map::Entry},
    fmt::{self, Display},
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::record::{CheckInRecord, Kind, RawCheckIn, Reason};

pub const NAME_MIN: usize = 2;
pub const DETAIL_MAX: usize = 200;
pub const NOTES_MAX: usize = 500;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+().\-\s]{7,20}$").expect("phone pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Kind,
    Name,
    Phone,
    Reason,
    OtherReason,
    ProductName,
    Notes,
    Company,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Kind => "kind",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Reason => "reason",
            Field::OtherReason => "otherReason",
            Field::ProductName => "productName",
            Field::Notes => "notes",
            Field::Company => "company",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    form_errors: Vec<String>,
    field_errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        self.field_errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    /// Keeps the message already recorded for `field`, if any.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        if let Entry::Vacant(entry) = self.field_errors.entry(field) {
            entry.insert(message.into());
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .form_errors
            .iter()
            .cloned()
            .chain(
                self.fields()
                    .map(|(field, message)| format!("{}: {message}", field.as_str())),
            )
            .collect::<Vec<_>>()
            .join("; ");

        write!(f, "invalid check-in: {summary}")
    }
}

impl std::error::Error for FieldErrors {}

pub fn validate(raw: &RawCheckIn) -> Result<CheckInRecord, FieldErrors> {
    let mut errors = FieldErrors::default();

    let kind = enum_field::<Kind>(raw, Field::Kind, &Kind::ALL, &mut errors);

    let name = string_field(raw, Field::Name, true, &mut errors).filter(|name| {
        let ok = name.chars().count() >= NAME_MIN;
        check(ok, Field::Name, "Please enter a full name", &mut errors)
    });

    let phone = string_field(raw, Field::Phone, true, &mut errors).filter(|phone| {
        let ok = PHONE.is_match(phone);
        check(ok, Field::Phone, "Enter a valid phone number", &mut errors)
    });

    let reason = enum_field::<Reason>(raw, Field::Reason, &Reason::ALL, &mut errors);

    let other_reason = bounded_field(raw, Field::OtherReason, DETAIL_MAX, &mut errors);
    let product_name = bounded_field(raw, Field::ProductName, DETAIL_MAX, &mut errors);
    let notes = bounded_field(raw, Field::Notes, NOTES_MAX, &mut errors);
    let company = bounded_field(raw, Field::Company, 0, &mut errors);

    if reason == Some(Reason::Other) && is_blank(other_reason.as_deref()) {
        errors.add(Field::OtherReason, "Please describe your reason.");
    }
    if reason == Some(Reason::Pharma) && is_blank(product_name.as_deref()) {
        errors.add(Field::ProductName, "Please list the product you represent.");
    }

    match (kind, name, phone, reason, other_reason, product_name, notes, company) {
        (
            Some(kind),
            Some(name),
            Some(phone),
            Some(reason),
            Some(other_reason),
            Some(product_name),
            Some(notes),
            Some(company),
        ) if errors.is_empty() => Ok(CheckInRecord {
            kind,
            name,
            phone,
            reason,
            other_reason,
            product_name,
            notes,
            company,
        }),
        _ => Err(errors),
    }
}

/// Entry point for payloads that have not been decoded yet.
pub fn validate_value(value: &Value) -> Result<CheckInRecord, FieldErrors> {
    if !value.is_object() {
        return Err(FieldErrors {
            form_errors: vec![format!("Expected object, received {}", type_name(value))],
            field_errors: BTreeMap::new(),
        });
    }

    let raw: RawCheckIn = serde_json::from_value(value.clone()).map_err(|e| FieldErrors {
        form_errors: vec![e.to_string()],
        field_errors: BTreeMap::new(),
    })?;

    validate(&raw)
}

fn check(ok: bool, field: Field, message: &str, errors: &mut FieldErrors) -> bool {
    if !ok {
        errors.add(field, message);
    }

    ok
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

fn string_field(
    raw: &RawCheckIn,
    field: Field,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<String> {
    match raw.get(field) {
        None | Some(Value::Null) if required => {
            errors.add(field, "Required");
            None
        }
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.add(field, format!("Expected string, received {}", type_name(other)));
            None
        }
    }
}

fn bounded_field(
    raw: &RawCheckIn,
    field: Field,
    max: usize,
    errors: &mut FieldErrors,
) -> Option<String> {
    string_field(raw, field, false, errors).filter(|value| {
        check(
            value.chars().count() <= max,
            field,
            &format!("String must contain at most {max} character(s)"),
            errors,
        )
    })
}

fn enum_field<T>(
    raw: &RawCheckIn,
    field: Field,
    options: &[T],
    errors: &mut FieldErrors,
) -> Option<T>
where
    T: FromStr + Display,
{
    let value = string_field(raw, field, true, errors)?;

    value.parse().ok().or_else(|| {
        let expected = options
            .iter()
            .map(|option| format!("'{option}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        errors.add(
            field,
            format!("Invalid enum value. Expected {expected}, received '{value}'"),
        );
        None
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
