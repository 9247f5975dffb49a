//! Input checks applied before anything reaches a store.
//!
//! Only emptiness is checked; names, mobile numbers and descriptions are
//! otherwise free text.

use crate::{Error, Result};

/// Trim `value` and reject it if nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::Blank { field });
  }
  Ok(trimmed.to_owned())
}

/// Trim `value`, mapping a blank string to `None`.
pub fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
