//! JSON REST API for Flatshare.
//!
//! Exposes an axum [`Router`] backed by any [`LedgerStore`]. Every ledger
//! route authenticates a room with HTTP Basic credentials and is scoped to
//! that room. TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", flatshare_api::api_router(store.clone()))
//! ```

pub mod auth;
pub mod dashboard;
pub mod deposits;
pub mod error;
pub mod expenses;
pub mod roommates;
pub mod rooms;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use flatshare_core::store::LedgerStore;

pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: LedgerStore> {
  pub store: Arc<S>,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: LedgerStore + Clone + 'static,
{
  Router::new()
    // Rooms
    .route("/rooms", post(rooms::register::<S>))
    .route("/room", get(rooms::current))
    // Roommates
    .route("/roommates", get(roommates::list::<S>).post(roommates::create::<S>))
    .route("/roommates/{name}", delete(roommates::remove::<S>))
    // Expenses
    .route("/expenses", get(expenses::list::<S>).post(expenses::create::<S>))
    .route("/expenses/{id}", delete(expenses::delete_one::<S>))
    // Deposits
    .route("/deposits", get(deposits::list::<S>).post(deposits::create::<S>))
    .route("/deposits/{id}", delete(deposits::delete_one::<S>))
    // Summary
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(AppState { store })
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use flatshare_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  fn basic(room: &str, password: &str) -> String {
    format!("Basic {}", B64.encode(format!("{room}:{password}")))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<(&str, &str)>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((room, password)) = auth {
      builder = builder.header(header::AUTHORIZATION, basic(room, password));
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn register(app: &Router, room: &str, password: &str) {
    let (status, _) = send(
      app,
      "POST",
      "/rooms",
      None,
      Some(json!({ "room_name": room, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  const FLAT: Option<(&str, &str)> = Some(("flat-4b", "s3cret"));

  // ── Auth ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_then_login() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let (status, room) = send(&app, "GET", "/room", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["room_name"], "flat-4b");
    assert!(room.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn bad_credentials_are_indistinguishable() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let wrong_password = send(&app, "GET", "/roommates", Some(("flat-4b", "nope")), None).await;
    let unknown_room = send(&app, "GET", "/roommates", Some(("flat-9z", "s3cret")), None).await;
    let no_header = send(&app, "GET", "/roommates", None, None).await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_room);
    assert_eq!(wrong_password, no_header);
  }

  #[tokio::test]
  async fn duplicate_room_is_a_warning() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let (status, body) = send(
      &app,
      "POST",
      "/rooms",
      None,
      Some(json!({ "room_name": "flat-4b", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["warning"].is_string());

    // The first password still works.
    let (status, _) = send(&app, "GET", "/room", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn blank_registration_is_rejected() {
    let app = app().await;
    let (status, _) = send(
      &app,
      "POST",
      "/rooms",
      None,
      Some(json!({ "room_name": "  ", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "POST",
      "/rooms",
      None,
      Some(json!({ "room_name": "flat", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Roommates ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn roommate_lifecycle() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let (status, asha) = send(
      &app,
      "POST",
      "/roommates",
      FLAT,
      Some(json!({ "name": "Asha", "mobile": "98450 12345" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(asha["name"], "Asha");

    let (status, body) =
      send(&app, "POST", "/roommates", FLAT, Some(json!({ "name": "Asha" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["warning"].as_str().unwrap().contains("Asha"));

    let (status, _) = send(&app, "POST", "/roommates", FLAT, Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, "GET", "/roommates", FLAT, None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", "/roommates/Asha", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (status, _) = send(&app, "DELETE", "/roommates/Asha", FLAT, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn removal_with_expenses_needs_force() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;
    send(&app, "POST", "/roommates", FLAT, Some(json!({ "name": "Ravi" }))).await;
    send(
      &app,
      "POST",
      "/expenses",
      FLAT,
      Some(json!({ "paid_by": "Ravi", "amount": 250, "date": "2026-10-15" })),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/roommates/Ravi", FLAT, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["warning"].is_string());

    let (status, _) = send(&app, "DELETE", "/roommates/Ravi?force=true", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, expenses) = send(&app, "GET", "/expenses", FLAT, None).await;
    assert_eq!(expenses[0]["paid_by"], "Ravi");
  }

  #[tokio::test]
  async fn removal_trims_the_name() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;
    send(&app, "POST", "/roommates", FLAT, Some(json!({ "name": " Asha " }))).await;

    let (status, body) = send(&app, "DELETE", "/roommates/Asha%20", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (status, _) = send(&app, "DELETE", "/roommates/%20", FLAT, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Expenses & deposits ───────────────────────────────────────────────────

  #[tokio::test]
  async fn amounts_have_a_ceiling() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let over = json!({ "roommate": "Asha", "amount": "10000000000.01" });
    let (status, body) = send(&app, "POST", "/deposits", FLAT, Some(over)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));

    for _ in 0..2 {
      let max = json!({ "roommate": "Asha", "amount": "10000000000" });
      let (status, _) = send(&app, "POST", "/deposits", FLAT, Some(max)).await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, dash) = send(&app, "GET", "/dashboard", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["all_time"]["deposits"], "20000000000.00");
  }

  #[tokio::test]
  async fn dates_need_four_digit_years() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let far = json!({ "paid_by": "Asha", "amount": 5, "date": "+10000-01-01" });
    let (status, _) = send(&app, "POST", "/expenses", FLAT, Some(far)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for uri in [
      "/expenses?on=%2B10000-01-01",
      "/deposits?from=%2B10000-01-01",
      "/dashboard?today=%2B10000-01-01",
    ] {
      let (status, _) = send(&app, "GET", uri, FLAT, None).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
  }

  #[tokio::test]
  async fn expense_validation() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    for body in [
      json!({ "paid_by": "Asha", "amount": 0 }),
      json!({ "paid_by": "Asha", "amount": "-5" }),
      json!({ "paid_by": "Asha", "amount": "1.005" }),
      json!({ "paid_by": "", "amount": 5 }),
      json!({ "paid_by": "Asha", "amount": 5, "category": "yacht" }),
    ] {
      let (status, _) = send(&app, "POST", "/expenses", FLAT, Some(body)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, list) = send(&app, "GET", "/expenses", FLAT, None).await;
    assert!(list.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn expense_create_list_delete() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    let (status, created) = send(
      &app,
      "POST",
      "/expenses",
      FLAT,
      Some(json!({
        "paid_by": "Asha",
        "amount": "12.5",
        "date": "2026-10-14",
        "category": "Groceries",
        "description": "Milk",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["amount"], "12.50");
    assert_eq!(created["category"], "groceries");

    let (_, on_day) = send(&app, "GET", "/expenses?on=2026-10-14", FLAT, None).await;
    assert_eq!(on_day.as_array().unwrap().len(), 1);
    let (_, other_day) = send(&app, "GET", "/expenses?on=2026-10-15", FLAT, None).await;
    assert!(other_day.as_array().unwrap().is_empty());

    let id = created["id"].as_i64().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/expenses/{id}"), FLAT, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/expenses/{id}"), FLAT, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn deposits_filter_by_range() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    for date in ["2026-09-30", "2026-10-01", "2026-10-15"] {
      let (status, _) = send(
        &app,
        "POST",
        "/deposits",
        FLAT,
        Some(json!({ "roommate": "Asha", "amount": 100, "date": date })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (_, october) =
      send(&app, "GET", "/deposits?from=2026-10-01&to=2026-10-15", FLAT, None).await;
    let dates: Vec<_> = october
      .as_array()
      .unwrap()
      .iter()
      .map(|d| d["date"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(dates, ["2026-10-15", "2026-10-01"]);
  }

  // ── Isolation ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn rooms_are_isolated() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;
    register(&app, "flat-9z", "other").await;
    let other = Some(("flat-9z", "other"));

    send(&app, "POST", "/roommates", FLAT, Some(json!({ "name": "Asha" }))).await;
    let (_, created) = send(
      &app,
      "POST",
      "/expenses",
      FLAT,
      Some(json!({ "paid_by": "Asha", "amount": 10 })),
    )
    .await;

    let (_, roommates) = send(&app, "GET", "/roommates", other, None).await;
    assert!(roommates.as_array().unwrap().is_empty());
    let (_, expenses) = send(&app, "GET", "/expenses", other, None).await;
    assert!(expenses.as_array().unwrap().is_empty());

    let id = created["id"].as_i64().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/expenses/{id}"), other, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_end_to_end() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;

    send(&app, "POST", "/roommates", FLAT, Some(json!({ "name": "Asha" }))).await;
    send(
      &app,
      "POST",
      "/expenses",
      FLAT,
      Some(json!({ "paid_by": "Asha", "amount": 500, "description": "Groceries" })),
    )
    .await;
    send(
      &app,
      "POST",
      "/deposits",
      FLAT,
      Some(json!({ "roommate": "Asha", "amount": 2000 })),
    )
    .await;

    let (status, dash) = send(&app, "GET", "/dashboard", FLAT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["todays_expense_total"], "500.00");
    assert_eq!(dash["month_to_date_deposits"], "2000.00");
    assert_eq!(dash["remaining_balance"], "1500.00");
    assert_eq!(dash["todays_expenses"][0]["description"], "Groceries");
    assert_eq!(dash["roommates"][0]["name"], "Asha");
  }

  #[tokio::test]
  async fn dashboard_honours_today_override() {
    let app = app().await;
    register(&app, "flat-4b", "s3cret").await;
    send(
      &app,
      "POST",
      "/deposits",
      FLAT,
      Some(json!({ "roommate": "Asha", "amount": 1000, "date": "2026-09-30" })),
    )
    .await;

    let (_, dash) = send(&app, "GET", "/dashboard?today=2026-10-15", FLAT, None).await;
    assert_eq!(dash["month_to_date_deposits"], "0.00");
    assert_eq!(dash["all_time"]["deposits"], "1000.00");
  }
}
