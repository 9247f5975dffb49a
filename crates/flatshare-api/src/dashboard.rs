//! Handler for `GET /dashboard`.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use flatshare_core::{period, store::LedgerStore, summary::Dashboard};
use serde::Deserialize;

use crate::{AppState, auth::CurrentRoom, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct DashboardParams {
  /// Evaluate as of this date instead of the server's local today.
  pub today: Option<NaiveDate>,
}

/// `GET /dashboard[?today=<date>]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let today = period::checked(params.today.unwrap_or_else(period::today))?;
  let dashboard = Dashboard::load(state.store.as_ref(), room.room_id, today)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(dashboard))
}
