//! Plain-text rendering of API results for the terminal.

use std::fmt::Write as _;

use flatshare_core::{
  ledger::{Deposit, Expense, Roommate},
  money::Money,
  summary::Dashboard,
};

/// `₹1500.00`, or `-₹3.50` for negative values.
pub fn money(currency: &str, value: impl Into<Money>) -> String {
  let value = value.into();
  if value.is_negative() {
    format!("-{currency}{}", Money::ZERO - value)
  } else {
    format!("{currency}{value}")
  }
}

pub fn roommates(list: &[Roommate]) -> String {
  if list.is_empty() {
    return "No roommates yet.\n".to_owned();
  }
  let mut out = String::new();
  for r in list {
    let line = match &r.mobile {
      Some(mobile) => format!("{}  ({mobile})", r.name),
      None => r.name.clone(),
    };
    writeln!(out, "{line}").ok();
  }
  out
}

pub fn expenses(currency: &str, list: &[Expense]) -> String {
  if list.is_empty() {
    return "No expenses.\n".to_owned();
  }
  let mut out = String::new();
  for e in list {
    writeln!(
      out,
      "#{:<5} {}  {:<12} {:>12}  {:<11} {}",
      e.id,
      e.date,
      e.paid_by,
      money(currency, e.amount),
      e.category.as_str(),
      e.description.as_deref().unwrap_or(""),
    )
    .ok();
  }
  out
}

pub fn deposits(currency: &str, list: &[Deposit]) -> String {
  if list.is_empty() {
    return "No deposits.\n".to_owned();
  }
  let mut out = String::new();
  for d in list {
    writeln!(
      out,
      "#{:<5} {}  {:<12} {:>12}",
      d.id,
      d.date,
      d.roommate,
      money(currency, d.amount)
    )
    .ok();
  }
  out
}

pub fn dashboard(currency: &str, dash: &Dashboard) -> String {
  let mut out = String::new();
  let m = |v: Money| money(currency, v);

  writeln!(out, "Today ({})", dash.today).ok();
  if dash.todays_expenses.is_empty() {
    writeln!(out, "  no expenses recorded today").ok();
  }
  for e in &dash.todays_expenses {
    let what = e.description.as_deref().unwrap_or(e.category.as_str());
    writeln!(out, "  {} spent {} for {what}", e.paid_by, money(currency, e.amount)).ok();
  }

  writeln!(out).ok();
  writeln!(out, "Total expenses today:   {}", m(dash.todays_expense_total)).ok();
  writeln!(
    out,
    "Deposits since {}: {}",
    dash.month_start,
    m(dash.month_to_date_deposits)
  )
  .ok();
  writeln!(out, "Remaining balance:      {}", m(dash.remaining_balance)).ok();

  writeln!(out).ok();
  writeln!(out, "All time").ok();
  writeln!(out, "  deposits:  {}", m(dash.all_time.deposits)).ok();
  writeln!(out, "  expenses:  {}", m(dash.all_time.expenses)).ok();
  writeln!(out, "  remaining: {}", m(dash.all_time.remaining)).ok();

  if !dash.by_category.is_empty() {
    writeln!(out).ok();
    writeln!(out, "By category").ok();
    for c in &dash.by_category {
      writeln!(out, "  {:<12} {:>12}", c.category.as_str(), m(c.total)).ok();
    }
  }
  if !dash.by_roommate.is_empty() {
    writeln!(out).ok();
    writeln!(out, "By roommate").ok();
    for r in &dash.by_roommate {
      writeln!(out, "  {:<12} {:>12}", r.roommate, m(r.total)).ok();
    }
  }
  out
}
