//! Error types for `flatshare-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required text field was empty or whitespace only.
  #[error("{field} cannot be empty")]
  Blank { field: &'static str },

  #[error("invalid amount {input:?}: {reason}")]
  InvalidAmount { input: String, reason: &'static str },

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  /// Only four-digit years keep the stored `YYYY-MM-DD` text sortable.
  #[error("invalid date {input:?}: {reason}")]
  InvalidDate { input: String, reason: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
