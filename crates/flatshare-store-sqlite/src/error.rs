//! Error type for `flatshare-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value could not be mapped back onto a domain type.
  #[error("corrupt row in {table}: {detail}")]
  CorruptRow { table: &'static str, detail: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
