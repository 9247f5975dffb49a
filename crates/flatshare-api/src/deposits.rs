//! Handlers for `/deposits` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/deposits` | Optional inclusive `?from=` / `?to=` dates; newest first |
//! | `POST`   | `/deposits` | Body: `{"roommate":"…","amount":2000,"date":"…"}` |
//! | `DELETE` | `/deposits/{id}` | 204, or 404 if not in this room |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use flatshare_core::{
  ledger::{Deposit, NewDeposit},
  money::Amount,
  period::{self, DateRange},
  store::{DepositQuery, LedgerStore},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, auth::CurrentRoom, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

/// `GET /deposits[?from=<date>][&to=<date>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Deposit>>, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let range = DateRange {
    from: period::checked_opt(params.from)?,
    to:   period::checked_opt(params.to)?,
  };
  let query = DepositQuery { range };
  let deposits = state
    .store
    .list_deposits(room.room_id, query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(deposits))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub roommate: String,
  pub amount:   Decimal,
  pub date:     Option<NaiveDate>,
}

/// `POST /deposits` — returns 201 + the stored [`Deposit`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let input = NewDeposit::new(
    &body.roommate,
    Amount::try_from(body.amount)?,
    body.date.unwrap_or_else(period::today),
  )?;
  let deposit = state
    .store
    .add_deposit(room.room_id, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(deposit)))
}

/// `DELETE /deposits/{id}`
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
    .delete_deposit(room.room_id, id)
    .await
    .map_err(ApiError::store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("deposit {id} not found")))
  }
}
