//! Request payload validation.
//!
//! Payloads arrive from the HTTP layer as loosely typed structs (every
//! field optional at the serde level). Each implements
//! [`IntoValidated`], which normalizes the text, runs the declarative
//! `validator` rules and converts into the typed input consumed by the
//! repositories. Failures never escape as panics; they come back as a
//! [`FieldErrors`] map keyed by the request field name.

mod client;
mod credentials;
mod interaction_log;
mod project;
mod reminder;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

pub use client::ClientPayload;
pub use credentials::{Credentials, CredentialsPayload};
pub use interaction_log::InteractionLogPayload;
pub use project::ProjectPayload;
pub use reminder::ReminderPayload;

/// Key under which `validator` files struct-level (schema) errors.
const SCHEMA_ERRORS_KEY: &str = "__all__";

/// Structured validation failure, shaped for per-field rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    form_errors: Vec<String>,
    field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// An error that is not attached to a single field.
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.form_errors.push(message.into());
        errors
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Move the messages filed under `from` to `to`. `validator` keys
    /// errors by the Rust field name, which can differ from the wire name.
    pub fn renamed(mut self, from: &str, to: &str) -> Self {
        if let Some(messages) = self.field_errors.remove(from) {
            self.field_errors
                .entry(to.to_string())
                .or_default()
                .extend(messages);
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.field_errors.get(name).map(Vec::as_slice)
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        parts.extend(
            self.field_errors
                .iter()
                .map(|(field, messages)| format!("{field}: {}", messages.join(", "))),
        );
        f.write_str(&parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let field = field.to_string();
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                if field == SCHEMA_ERRORS_KEY {
                    out.form_errors.push(message);
                } else {
                    out.add(&field, message);
                }
            }
        }
        out
    }
}

/// Conversion from an untrusted payload into a typed, normalized input.
pub trait IntoValidated {
    type Output;

    fn into_validated(self) -> Result<Self::Output, FieldErrors>;
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Parse the date shapes accepted on the wire: RFC 3339,
/// `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("date").with_message("Invalid date format".into())),
    }
}

fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    match Uuid::parse_str(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("uuid").with_message("Invalid uuid".into())),
    }
}

/// Trim a required text field. Blank values stay `Some("")` so the
/// length rule reports them.
fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Trim an optional text field; blank means absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, FieldErrors> {
    value.ok_or_else(|| FieldErrors::single(field, "Required"))
}

fn required_date(field: &str, value: Option<String>) -> Result<DateTime<Utc>, FieldErrors> {
    let raw = required(field, value)?;
    parse_date(&raw).ok_or_else(|| FieldErrors::single(field, "Invalid date format"))
}

fn optional_uuid(field: &str, value: Option<String>) -> Result<Option<Uuid>, FieldErrors> {
    value
        .map(|raw| Uuid::parse_str(&raw).map_err(|_| FieldErrors::single(field, "Invalid uuid")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_date("2026-03-01T10:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let dt = parse_date("2026-12-24").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2026, 12, 24));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn parses_naive_datetime() {
        assert!(parse_date("2026-01-02T03:04:05").is_some());
        assert!(parse_date("2026-01-02T03:04:05.123").is_some());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_date("tomorrow").is_none());
        assert!(parse_date("2026-13-01").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn field_errors_serialize_like_a_flattened_form() {
        let mut errors = FieldErrors::form("top-level problem");
        errors.add("name", "Required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["formErrors"][0], "top-level problem");
        assert_eq!(json["fieldErrors"]["name"][0], "Required");
    }

    #[test]
    fn display_lists_every_message() {
        let mut errors = FieldErrors::single("email", "Invalid email");
        errors.add("phone", "Required");
        let text = errors.to_string();
        assert!(text.contains("email: Invalid email"));
        assert!(text.contains("phone: Required"));
    }
}
