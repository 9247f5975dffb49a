//! Rooms — the tenant boundary.
//!
//! Every roommate, expense and deposit belongs to exactly one room, and every
//! store operation is scoped by a [`RoomId`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, validate};

/// Database identifier of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A room as exposed to callers. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
  pub room_id:    RoomId,
  pub room_name:  String,
  pub created_at: DateTime<Utc>,
}

/// A room together with its stored password hash, for login checks only.
#[derive(Debug, Clone)]
pub struct RoomRecord {
  pub room:          Room,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Input to [`crate::store::LedgerStore::create_room`].
#[derive(Debug, Clone)]
pub struct NewRoom {
  pub room_name:     String,
  pub password_hash: String,
}

impl NewRoom {
  /// Validate the room name. The hash is produced by the caller.
  pub fn new(room_name: &str, password_hash: String) -> Result<Self> {
    Ok(Self {
      room_name: validate::required("room_name", room_name)?,
      password_hash,
    })
  }
}
