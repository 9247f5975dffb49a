//! Room login over HTTP Basic auth.
//!
//! The Basic username is the room name and the password is the room password.
//! Passwords are stored as argon2 hashes, never in plaintext. Every failure
//! mode (missing header, unknown room, wrong password) is reported as the
//! same bare `401`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use flatshare_core::{room::Room, store::LedgerStore};
use rand_core::OsRng;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// Extractor for the room the request authenticated as. Handlers that take
/// it only ever see that room's rows.
pub struct CurrentRoom(pub Room);

/// Decode `Authorization: Basic …` into `(room_name, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;

  let (room_name, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((room_name.to_owned(), password.to_owned()))
}

/// Produce an argon2 PHC string for `password`.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(hash_failure)
  })
  .await
  .map_err(ApiError::store)?
}

fn hash_failure(e: impl std::fmt::Display) -> ApiError {
  ApiError::Store(format!("cannot hash password: {e}").into())
}

/// A real hash that no room owns. Unknown room names are verified against it
/// so they take as long to reject as a wrong password.
async fn decoy_hash() -> Result<&'static str, ApiError> {
  static DECOY: OnceCell<String> = OnceCell::const_new();
  DECOY
    .get_or_try_init(|| hash_password("flatshare-decoy".to_owned()))
    .await
    .map(String::as_str)
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, ApiError> {
  tokio::task::spawn_blocking(move || {
    PasswordHash::new(&password_hash).is_ok_and(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
  })
  .await
  .map_err(ApiError::store)
}

impl<S> FromRequestParts<AppState<S>> for CurrentRoom
where
  S: LedgerStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let (room_name, password) = basic_credentials(&parts.headers)?;

    let record = state
      .store
      .find_room(room_name.clone())
      .await
      .map_err(ApiError::store)?;

    match record {
      Some(record) => {
        if verify_password(password, record.password_hash).await? {
          return Ok(CurrentRoom(record.room));
        }
      }
      None => {
        verify_password(password, decoy_hash().await?.to_owned()).await?;
      }
    }

    warn!(%room_name, "room login failed");
    Err(ApiError::Unauthorized)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn decodes_basic_credentials() {
    let value = format!("Basic {}", B64.encode("flat-4b:s3cret:with:colons"));
    let (room, password) = basic_credentials(&headers(&value)).unwrap();
    assert_eq!(room, "flat-4b");
    assert_eq!(password, "s3cret:with:colons");
  }

  #[test]
  fn rejects_missing_or_malformed_header() {
    assert!(matches!(basic_credentials(&HeaderMap::new()), Err(ApiError::Unauthorized)));
    assert!(matches!(
      basic_credentials(&headers("Bearer abc")),
      Err(ApiError::Unauthorized)
    ));
    assert!(matches!(
      basic_credentials(&headers("Basic !!!not-base64!!!")),
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn decoy_hash_is_real_and_stable() {
    let first = decoy_hash().await.unwrap();
    assert!(PasswordHash::new(first).is_ok());
    assert_eq!(first, decoy_hash().await.unwrap());
    assert!(!verify_password("s3cret".into(), first.to_owned()).await.unwrap());
  }

  #[test]
  fn hashing_failures_are_server_errors() {
    use axum::{http::StatusCode, response::IntoResponse};

    let err = hash_failure("salt too short");
    assert!(matches!(err, ApiError::Store(_)));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[tokio::test]
  async fn hash_then_verify() {
    let hash = hash_password("hunter2".into()).await.unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2".into(), hash.clone()).await.unwrap());
    assert!(!verify_password("hunter3".into(), hash).await.unwrap());
    assert!(!verify_password("hunter2".into(), "plaintext".into()).await.unwrap());
  }
}
