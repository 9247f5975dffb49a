//! Ledger rows — roommates, expenses and deposits.
//!
//! Rows are never updated in place. Expenses and deposits refer to a roommate
//! by name only; removing the roommate leaves those rows untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result, money::Amount, period, validate};

// ─── Category ────────────────────────────────────────────────────────────────

/// What an expense was for.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
  Rent,
  Electricity,
  Water,
  Internet,
  Groceries,
  #[default]
  Others,
}

impl Category {
  /// The value stored in the `category` column.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownCategory(s.to_owned()))
  }
}

// ─── Roommate ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roommate {
  pub id:     i64,
  pub name:   String,
  pub mobile: Option<String>,
}

/// Input to [`crate::store::LedgerStore::add_roommate`].
#[derive(Debug, Clone)]
pub struct NewRoommate {
  pub name:   String,
  pub mobile: Option<String>,
}

impl NewRoommate {
  pub fn new(name: &str, mobile: Option<String>) -> Result<Self> {
    Ok(Self {
      name:   validate::required("name", name)?,
      mobile: validate::optional(mobile),
    })
  }
}

// ─── Expense ─────────────────────────────────────────────────────────────────

/// A dated outflow paid by one roommate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
  pub id:          i64,
  /// Roommate name at the time of recording; not a foreign key.
  pub paid_by:     String,
  pub amount:      Amount,
  pub date:        NaiveDate,
  pub category:    Category,
  pub description: Option<String>,
}

/// Input to [`crate::store::LedgerStore::add_expense`].
#[derive(Debug, Clone)]
pub struct NewExpense {
  pub paid_by:     String,
  pub amount:      Amount,
  pub date:        NaiveDate,
  pub category:    Category,
  pub description: Option<String>,
}

impl NewExpense {
  pub fn new(paid_by: &str, amount: Amount, date: NaiveDate) -> Result<Self> {
    Ok(Self {
      paid_by: validate::required("paid_by", paid_by)?,
      amount,
      date: period::checked(date)?,
      category: Category::default(),
      description: None,
    })
  }

  pub fn category(mut self, category: Category) -> Self {
    self.category = category;
    self
  }

  pub fn description(mut self, description: Option<String>) -> Self {
    self.description = validate::optional(description);
    self
  }
}

// ─── Deposit ─────────────────────────────────────────────────────────────────

/// A dated contribution into the shared pot by one roommate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
  pub id:       i64,
  pub roommate: String,
  pub amount:   Amount,
  pub date:     NaiveDate,
}

/// Input to [`crate::store::LedgerStore::add_deposit`].
#[derive(Debug, Clone)]
pub struct NewDeposit {
  pub roommate: String,
  pub amount:   Amount,
  pub date:     NaiveDate,
}

impl NewDeposit {
  pub fn new(roommate: &str, amount: Amount, date: NaiveDate) -> Result<Self> {
    Ok(Self {
      roommate: validate::required("roommate", roommate)?,
      amount,
      date: period::checked(date)?,
    })
  }
}
