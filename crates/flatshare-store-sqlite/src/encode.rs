//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD`, timestamps as RFC 3339 strings,
//! amounts as integer minor units and categories as their snake_case name.

use chrono::{DateTime, NaiveDate, Utc};
use flatshare_core::{
  ledger::{Category, Deposit, Expense, Roommate},
  money::{Amount, Money},
  period::{DATE_FORMAT, DateRange},
  room::{Room, RoomId, RoomRecord},
  summary::CategoryTotal,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Bounds for `date BETWEEN ?lo AND ?hi`. Open ends become sentinels that
/// sort before and after every `YYYY-MM-DD` string.
pub fn encode_range(range: DateRange) -> (String, String) {
  (
    range.from.map(encode_date).unwrap_or_else(|| "0000-00-00".to_owned()),
    range.to.map(encode_date).unwrap_or_else(|| "9999-99-99".to_owned()),
  )
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Amount ──────────────────────────────────────────────────────────────────

fn decode_amount(table: &'static str, minor: i64) -> Result<Amount> {
  Amount::from_minor(minor).map_err(|e| Error::CorruptRow { table, detail: e.to_string() })
}

// ─── Category ────────────────────────────────────────────────────────────────

fn decode_category(s: &str) -> Result<Category> {
  Category::parse(s).map_err(|e| Error::CorruptRow { table: "expenses", detail: e.to_string() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `rooms` row.
pub struct RawRoom {
  pub id:            i64,
  pub room_name:     String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawRoom {
  pub fn into_record(self) -> Result<RoomRecord> {
    Ok(RoomRecord {
      room:          Room {
        room_id:    RoomId(self.id),
        room_name:  self.room_name,
        created_at: decode_dt(&self.created_at)?,
      },
      password_hash: self.password_hash,
    })
  }
}

/// Raw values read directly from an `expenses` row.
pub struct RawExpense {
  pub id:          i64,
  pub paid_by:     String,
  pub amount:      i64,
  pub date:        String,
  pub category:    String,
  pub description: Option<String>,
}

impl RawExpense {
  pub const COLUMNS: &'static str = "id, paid_by, amount, date, category, description";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      paid_by:     row.get(1)?,
      amount:      row.get(2)?,
      date:        row.get(3)?,
      category:    row.get(4)?,
      description: row.get(5)?,
    })
  }

  pub fn into_expense(self) -> Result<Expense> {
    Ok(Expense {
      id:          self.id,
      paid_by:     self.paid_by,
      amount:      decode_amount("expenses", self.amount)?,
      date:        decode_date(&self.date)?,
      category:    decode_category(&self.category)?,
      description: self.description,
    })
  }
}

/// Raw values read directly from a `deposits` row.
pub struct RawDeposit {
  pub id:       i64,
  pub roommate: String,
  pub amount:   i64,
  pub date:     String,
}

impl RawDeposit {
  pub const COLUMNS: &'static str = "id, roommate, amount, date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      roommate: row.get(1)?,
      amount:   row.get(2)?,
      date:     row.get(3)?,
    })
  }

  pub fn into_deposit(self) -> Result<Deposit> {
    Ok(Deposit {
      id:       self.id,
      roommate: self.roommate,
      amount:   decode_amount("deposits", self.amount)?,
      date:     decode_date(&self.date)?,
    })
  }
}

pub fn roommate_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Roommate> {
  Ok(Roommate {
    id:     row.get(0)?,
    name:   row.get(1)?,
    mobile: row.get(2)?,
  })
}

/// A `(category, SUM(amount))` row from a GROUP BY query.
pub fn decode_category_total((category, total): (String, i64)) -> Result<CategoryTotal> {
  Ok(CategoryTotal {
    category: decode_category(&category)?,
    total:    Money::from_minor(total),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn open_range_sentinels_bracket_real_dates() {
    let (lo, hi) = encode_range(DateRange::all());
    let day = encode_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
    assert!(lo < day && day < hi);
  }

  #[test]
  fn dates_are_zero_padded() {
    let day = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
    assert_eq!(encode_date(day), "2026-03-07");
    assert_eq!(decode_date("2026-03-07").unwrap(), day);
    assert!(decode_date("2026-3-7x").is_err());
  }
}
