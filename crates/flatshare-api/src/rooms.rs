//! Handlers for room registration and the current room.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/rooms` | Body: `{"room_name":"…","password":"…"}`; no auth; 409 if taken |
//! | `GET`  | `/room` | The authenticated room |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use flatshare_core::{
  room::{NewRoom, Room},
  store::{CreateRoom, LedgerStore},
  validate,
};
use serde::Deserialize;
use tracing::info;

use crate::{
  AppState,
  auth::{CurrentRoom, hash_password},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub room_name: String,
  pub password:  String,
}

/// `POST /rooms` — returns 201 + the new [`Room`].
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore + Clone + 'static,
{
  validate::required("password", &body.password)?;
  // Validate the name before paying for the hash.
  let room_name = validate::required("room_name", &body.room_name)?;
  let input = NewRoom::new(&room_name, hash_password(body.password).await?)?;

  match state.store.create_room(input).await.map_err(ApiError::store)? {
    CreateRoom::Created(room) => {
      info!(room_id = %room.room_id, room_name = %room.room_name, "room registered");
      Ok((StatusCode::CREATED, Json(room)))
    }
    CreateRoom::Duplicate => Err(ApiError::Warning(format!(
      "room {room_name:?} already exists"
    ))),
  }
}

/// `GET /room`
pub async fn current(CurrentRoom(room): CurrentRoom) -> Json<Room> { Json(room) }
