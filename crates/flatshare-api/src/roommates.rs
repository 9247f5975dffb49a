//! Handlers for `/roommates` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/roommates` | All roommates in the room |
//! | `POST`   | `/roommates` | Body: `{"name":"…","mobile":"…"}`; 409 warning on duplicate |
//! | `DELETE` | `/roommates/{name}` | `?force=true` removes even with expenses recorded |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use flatshare_core::{
  ledger::{NewRoommate, Roommate},
  store::{AddRoommate, LedgerStore, RemovalPolicy, RemoveRoommate},
  validate,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::CurrentRoom, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /roommates`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
) -> Result<Json<Vec<Roommate>>, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let roommates = state
    .store
    .list_roommates(room.room_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(roommates))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:   String,
  pub mobile: Option<String>,
}

/// `POST /roommates` — returns 201 + the stored [`Roommate`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  let input = NewRoommate::new(&body.name, body.mobile)?;
  let name = input.name.clone();

  match state
    .store
    .add_roommate(room.room_id, input)
    .await
    .map_err(ApiError::store)?
  {
    AddRoommate::Added(roommate) => Ok((StatusCode::CREATED, Json(roommate))),
    AddRoommate::Duplicate => Err(ApiError::Warning(format!(
      "roommate {name:?} already exists"
    ))),
  }
}

// ─── Remove ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RemoveParams {
  /// Remove even if expenses name this roommate as payer. Default `false`.
  #[serde(default)]
  pub force: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Removed {
  pub removed: usize,
}

/// `DELETE /roommates/{name}[?force=true]`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  CurrentRoom(room): CurrentRoom,
  Path(name): Path<String>,
  Query(params): Query<RemoveParams>,
) -> Result<Json<Removed>, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  // Stored names are trimmed.
  let name = validate::required("name", &name)?;
  let policy = if params.force {
    RemovalPolicy::Orphan
  } else {
    RemovalPolicy::BlockIfExpenses
  };

  match state
    .store
    .remove_roommate(room.room_id, name.clone(), policy)
    .await
    .map_err(ApiError::store)?
  {
    RemoveRoommate::Removed(removed) => Ok(Json(Removed { removed })),
    RemoveRoommate::NotFound => Err(ApiError::NotFound(format!("roommate {name:?} not found"))),
    RemoveRoommate::HasExpenses(n) => Err(ApiError::Warning(format!(
      "cannot remove {name:?}: {n} expense(s) recorded; delete them first or force removal"
    ))),
  }
}
