//! Aggregate figures shown on the dashboard.
//!
//! The headline balance compares two different windows: deposits are summed
//! month-to-date while expenses are summed for today only. All-time figures
//! are reported alongside it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  ledger::{Category, Expense, Roommate},
  money::Money,
  period::{DateRange, month_start},
  room::RoomId,
  store::{ExpenseQuery, LedgerStore},
};

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
  pub category: Category,
  pub total:    Money,
}

/// Total paid by one payer name (which may no longer be a roommate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoommateTotal {
  pub roommate: String,
  pub total:    Money,
}

/// Deposits in, expenses out, and what is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
  pub deposits:  Money,
  pub expenses:  Money,
  /// `deposits - expenses`; negative when overspent.
  pub remaining: Money,
}

impl Balance {
  pub fn new(deposits: Money, expenses: Money) -> Self {
    Self { deposits, expenses, remaining: deposits - expenses }
  }
}

/// Everything the home screen shows for one room on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
  pub today:                  NaiveDate,
  pub month_start:            NaiveDate,
  pub todays_expenses:        Vec<Expense>,
  pub todays_expense_total:   Money,
  pub month_to_date_deposits: Money,
  /// Month-to-date deposits minus today's expenses.
  pub remaining_balance:      Money,
  pub all_time:               Balance,
  pub roommates:              Vec<Roommate>,
  pub by_category:            Vec<CategoryTotal>,
  pub by_roommate:            Vec<RoommateTotal>,
}

impl Dashboard {
  /// Query `store` for every figure on the dashboard of `room` as of `today`.
  pub async fn load<S: LedgerStore>(
    store: &S,
    room: RoomId,
    today: NaiveDate,
  ) -> Result<Self, S::Error> {
    let todays_expenses = store
      .list_expenses(room, ExpenseQuery { on: Some(today), paid_by: None })
      .await?;
    let todays_expense_total = store.expense_total(room, DateRange::on(today)).await?;
    let month_to_date_deposits = store
      .deposit_total(room, DateRange::month_to_date(today))
      .await?;

    let all_time = Balance::new(
      store.deposit_total(room, DateRange::all()).await?,
      store.expense_total(room, DateRange::all()).await?,
    );

    Ok(Self {
      today,
      month_start: month_start(today),
      todays_expenses,
      todays_expense_total,
      month_to_date_deposits,
      remaining_balance: month_to_date_deposits - todays_expense_total,
      all_time,
      roommates: store.list_roommates(room).await?,
      by_category: store.expense_totals_by_category(room).await?,
      by_roommate: store.expense_totals_by_roommate(room).await?,
    })
  }
}
