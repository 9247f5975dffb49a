//! Calendar-date windows used by the aggregate queries.
//!
//! Dates are persisted as zero-padded `YYYY-MM-DD` strings, so lexicographic
//! order equals chronological order and a window can be checked with plain
//! string comparison in SQL.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The storage and wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date on the local clock.
pub fn today() -> NaiveDate { Local::now().date_naive() }

/// Accept `day` only if its year is in `0..=9999`.
pub fn checked(day: NaiveDate) -> Result<NaiveDate> {
  if (0..=9999).contains(&day.year()) {
    Ok(day)
  } else {
    Err(Error::InvalidDate { input: day.to_string(), reason: "year must be 0000-9999" })
  }
}

/// [`checked`] for each present bound.
pub fn checked_opt(day: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
  day.map(checked).transpose()
}

/// Parse a `YYYY-MM-DD` date from user input.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  let day = NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
    input:  s.to_owned(),
    reason: "expected YYYY-MM-DD",
  })?;
  checked(day)
}

/// The first calendar day of `day`'s month.
pub fn month_start(day: NaiveDate) -> NaiveDate {
  // Day 1 exists in every month.
  day.with_day(1).unwrap_or(day)
}

/// An inclusive range of calendar dates. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

impl DateRange {
  /// Every date.
  pub const fn all() -> Self { Self { from: None, to: None } }

  /// A single day.
  pub const fn on(day: NaiveDate) -> Self {
    Self { from: Some(day), to: Some(day) }
  }

  /// From the first of `today`'s month through `today`, both inclusive.
  pub fn month_to_date(today: NaiveDate) -> Self {
    Self { from: Some(month_start(today)), to: Some(today) }
  }

  pub fn contains(&self, day: NaiveDate) -> bool {
    self.from.is_none_or(|from| from <= day) && self.to.is_none_or(|to| day <= to)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap() }

  #[test]
  fn month_start_is_first_day() {
    assert_eq!(month_start(d("2026-10-15")), d("2026-10-01"));
    assert_eq!(month_start(d("2024-02-29")), d("2024-02-01"));
    assert_eq!(month_start(d("2026-01-01")), d("2026-01-01"));
  }

  #[test]
  fn month_to_date_excludes_previous_month_end() {
    let range = DateRange::month_to_date(d("2026-10-15"));
    assert!(range.contains(d("2026-10-01")));
    assert!(range.contains(d("2026-10-15")));
    assert!(!range.contains(d("2026-09-30")));
    assert!(!range.contains(d("2026-10-16")));
  }

  #[test]
  fn string_order_matches_date_order() {
    let a = d("2026-09-30").format(DATE_FORMAT).to_string();
    let b = d("2026-10-01").format(DATE_FORMAT).to_string();
    let c = d("2026-10-15").format(DATE_FORMAT).to_string();
    assert!(a < b && b < c);
  }

  #[test]
  fn signed_years_are_rejected() {
    let far = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
    let before = NaiveDate::from_ymd_opt(-1, 1, 1).unwrap();
    assert!(matches!(checked(far), Err(Error::InvalidDate { .. })));
    assert!(matches!(checked(before), Err(Error::InvalidDate { .. })));
    assert_eq!(checked(d("0000-01-01")).unwrap(), d("0000-01-01"));
    assert_eq!(checked_opt(None).unwrap(), None);

    let far_json: NaiveDate = serde_json::from_str("\"+10000-01-01\"").unwrap();
    assert!(checked(far_json).is_err());
  }

  #[test]
  fn parses_user_dates() {
    assert_eq!(parse_date(" 2026-10-15 ").unwrap(), d("2026-10-15"));
    assert!(parse_date("15/10/2026").is_err());
    assert!(parse_date("+10000-01-01").is_err());
  }

  #[test]
  fn unbounded_range_contains_everything() {
    assert!(DateRange::all().contains(d("1999-12-31")));
    assert!(DateRange::on(d("2026-10-15")).contains(d("2026-10-15")));
    assert!(!DateRange::on(d("2026-10-15")).contains(d("2026-10-14")));
  }
}
