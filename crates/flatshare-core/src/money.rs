//! Exact monetary values.
//!
//! Every value is held as a whole number of minor units (hundredths), which
//! is also how it is stored in the database. [`Decimal`] is used only at the
//! edges: parsing user input, JSON, and display.

use std::{
  fmt,
  iter::Sum,
  ops::{Add, Sub},
  str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive as _};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const MINOR_SCALE: u32 = 2;

/// Largest single amount, in minor units (10 billion whole units). Keeps any
/// realistic `SUM` over a room's rows inside `i64`.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000;

// ─── Money ───────────────────────────────────────────────────────────────────

/// A signed sum of money — totals and balances. May be zero or negative.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
  pub const ZERO: Money = Money(0);

  pub const fn from_minor(minor: i64) -> Self { Self(minor) }

  /// The value in hundredths, as persisted.
  pub const fn minor(self) -> i64 { self.0 }

  pub fn to_decimal(self) -> Decimal { Decimal::new(self.0, MINOR_SCALE) }

  pub fn is_negative(self) -> bool { self.0 < 0 }
}

impl TryFrom<Decimal> for Money {
  type Error = Error;

  fn try_from(value: Decimal) -> Result<Self> {
    let invalid = |reason| Error::InvalidAmount { input: value.to_string(), reason };

    let scaled = value
      .checked_mul(Decimal::ONE_HUNDRED)
      .ok_or_else(|| invalid("out of range"))?;
    if !scaled.fract().is_zero() {
      return Err(invalid("more than two decimal places"));
    }
    scaled
      .to_i64()
      .map(Money)
      .ok_or_else(|| invalid("out of range"))
  }
}

impl From<Money> for Decimal {
  fn from(value: Money) -> Self { value.to_decimal() }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_decimal())
  }
}

impl Add for Money {
  type Output = Money;

  fn add(self, rhs: Money) -> Money { Money(self.0 + rhs.0) }
}

impl Sub for Money {
  type Output = Money;

  fn sub(self, rhs: Money) -> Money { Money(self.0 - rhs.0) }
}

impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
    iter.fold(Money::ZERO, Add::add)
  }
}

// ─── Amount ──────────────────────────────────────────────────────────────────

/// A strictly positive amount attached to a single expense or deposit.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Money);

impl Amount {
  /// Build from persisted minor units. Rejects zero and negative values.
  pub fn from_minor(minor: i64) -> Result<Self> {
    Self::try_from(Money::from_minor(minor))
  }

  pub const fn money(self) -> Money { self.0 }

  pub const fn minor(self) -> i64 { self.0.minor() }
}

impl TryFrom<Money> for Amount {
  type Error = Error;

  fn try_from(value: Money) -> Result<Self> {
    if value.minor() <= 0 {
      return Err(Error::InvalidAmount {
        input:  value.to_string(),
        reason: "must be greater than zero",
      });
    }
    if value.minor() > MAX_AMOUNT_MINOR {
      return Err(Error::InvalidAmount { input: value.to_string(), reason: "out of range" });
    }
    Ok(Amount(value))
  }
}

impl TryFrom<Decimal> for Amount {
  type Error = Error;

  fn try_from(value: Decimal) -> Result<Self> {
    Money::try_from(value)?.try_into()
  }
}

impl From<Amount> for Decimal {
  fn from(value: Amount) -> Self { value.0.to_decimal() }
}

impl From<Amount> for Money {
  fn from(value: Amount) -> Self { value.0 }
}

impl FromStr for Amount {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let decimal = Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount {
      input:  s.to_owned(),
      reason: "not a decimal number",
    })?;
    decimal.try_into()
  }
}

impl fmt::Display for Amount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}
