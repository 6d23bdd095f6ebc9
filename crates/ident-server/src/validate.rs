//! Request body and field validation for `POST /api/contacts/identify`.
//!
//! Runs before the consolidation engine; the engine itself assumes its
//! inputs are well-formed.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// JSON body accepted by the identify endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyBody {
  pub email:        Option<String>,
  /// Accepted as a JSON string or a bare number.
  #[serde(default, deserialize_with = "string_or_number")]
  pub phone_number: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PhoneField {
  Text(String),
  Number(u64),
}

fn string_or_number<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<PhoneField>::deserialize(d)?.map(|p| match p {
    PhoneField::Text(s) => s,
    PhoneField::Number(n) => n.to_string(),
  }))
}

/// A validated request: trimmed, blanks dropped, at least one field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyRequest {
  pub email:        Option<String>,
  pub phone_number: Option<String>,
}

/// Check every rule and report all failures at once.
pub fn identify(body: IdentifyBody) -> Result<IdentifyRequest, ApiError> {
  let email = trimmed(body.email);
  let phone_number = trimmed(body.phone_number);
  let mut errors = Vec::new();

  if let Some(e) = &email
    && !is_email(e)
  {
    errors.push("Must provide a valid email address".to_owned());
  }
  if let Some(p) = &phone_number
    && !is_phone_number(p)
  {
    errors.push("Must provide a valid phone number".to_owned());
  }
  if email.is_none() && phone_number.is_none() {
    errors.push("Either email or phoneNumber must be provided".to_owned());
  }

  if errors.is_empty() {
    Ok(IdentifyRequest { email, phone_number })
  } else {
    Err(ApiError::Validation(errors))
  }
}

fn trimmed(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// `local@domain.tld`: no whitespace or stray `@`, and a dotted domain with
/// no empty labels.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$").expect("valid regex")
});

/// An optional leading `+`, then digit groups separated by single spaces or
/// dashes.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\+?[0-9]+(?:[ -][0-9]+)*$").expect("valid regex")
});

pub fn is_email(s: &str) -> bool { s.len() <= 254 && EMAIL.is_match(s) }

/// Digit groups as above, 6 to 15 digits in total.
pub fn is_phone_number(s: &str) -> bool {
  let digits = s.chars().filter(char::is_ascii_digit).count();
  PHONE.is_match(s) && (6..=15).contains(&digits)
}
