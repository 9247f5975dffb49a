//! Handlers for `/expenses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/expenses` | Optional `?on=YYYY-MM-DD` and `?paid_by=…`; newest first |
//! | `POST`   | `/expenses` | Body: [`CreateBody`]; `date` defaults to today |
//! | `DELETE` | `/expenses/{id}` | 204, or 404 if not in this room |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use flatshare_core::{
  ledger::{Category, Expense, NewExpense},
  money::Amount,
  period,
  store::{ExpenseQuery, LedgerStore},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, auth::CurrentRoom, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub on:      Option<NaiveDate>,
  pub paid_by: Option<String>,
}

/// `GET /expenses[?on=<date>][&paid_by=<name>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Expense>>, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let query = ExpenseQuery { on: period::checked_opt(params.on)?, paid_by: params.paid_by };
  let expenses = state
    .store
    .list_expenses(room.room_id, query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(expenses))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /expenses`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub paid_by:     String,
  /// A JSON number or decimal string with at most two fractional digits.
  pub amount:      Decimal,
  pub date:        Option<NaiveDate>,
  pub category:    Option<String>,
  pub description: Option<String>,
}

impl CreateBody {
  fn into_new_expense(self, today: NaiveDate) -> Result<NewExpense, ApiError> {
    let amount = Amount::try_from(self.amount)?;
    let category = self
      .category
      .as_deref()
      .map(Category::parse)
      .transpose()?
      .unwrap_or_default();

    Ok(
      NewExpense::new(&self.paid_by, amount, self.date.unwrap_or(today))?
        .category(category)
        .description(self.description),
    )
  }
}

/// `POST /expenses` — returns 201 + the stored [`Expense`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let input = body.into_new_expense(period::today())?;
  let expense = state
    .store
    .add_expense(room.room_id, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(expense)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /expenses/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  if state
    .store
    .delete_expense(room.room_id, id)
    .await
    .map_err(ApiError::store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("expense {id} not found")))
  }
}
