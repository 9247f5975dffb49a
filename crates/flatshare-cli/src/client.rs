//! Async HTTP client wrapping the flatshare JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use flatshare_core::{
  ledger::{Category, Deposit, Expense, Roommate},
  money::Amount,
  room::Room,
  summary::Dashboard,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;

/// Connection settings for the flatshare API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub room:     String,
  pub password: String,
}

/// Result of a write the server may decline with a soft warning (`409`).
#[derive(Debug)]
pub enum Outcome<T> {
  Done(T),
  Warning(String),
}

impl<T> Outcome<T> {
  /// Treat a warning as an error, for calls that never produce one.
  pub fn done(self) -> Result<T> {
    match self {
      Outcome::Done(v) => Ok(v),
      Outcome::Warning(w) => Err(anyhow!(w)),
    }
  }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
  #[serde(default)]
  error:   Option<String>,
  #[serde(default)]
  warning: Option<String>,
}

#[derive(Deserialize)]
struct Removed {
  removed: usize,
}

/// Async HTTP client for the flatshare JSON REST API.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `/api/<collection>/<segment>` with `segment` percent-encoded.
  fn item_url(&self, collection: &str, segment: &str) -> Result<Url> {
    let mut url = Url::parse(&self.url(collection))
      .with_context(|| format!("invalid server url {:?}", self.config.base_url))?;
    url
      .path_segments_mut()
      .map_err(|_| anyhow!("server url {:?} cannot take a path", self.config.base_url))?
      .push(segment);
    Ok(url)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.room.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.room, Some(&self.config.password))
    }
  }

  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Outcome<Response>> {
    debug!(what, "sending request");
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(Outcome::Done(resp));
    }

    let body: ErrorBody = resp.json().await.unwrap_or_default();
    match (status, body) {
      (StatusCode::CONFLICT, ErrorBody { warning: Some(w), .. }) => Ok(Outcome::Warning(w)),
      (StatusCode::UNAUTHORIZED, _) => {
        Err(anyhow!("{what} → 401: room name or password not accepted"))
      }
      (status, ErrorBody { error: Some(e), .. }) => Err(anyhow!("{what} → {status}: {e}")),
      (status, _) => Err(anyhow!("{what} → {status}")),
    }
  }

  async fn json<T: DeserializeOwned>(
    &self,
    req: RequestBuilder,
    what: &str,
  ) -> Result<Outcome<T>> {
    match self.send(req, what).await? {
      Outcome::Done(resp) => resp
        .json()
        .await
        .map(Outcome::Done)
        .with_context(|| format!("deserialising {what}")),
      Outcome::Warning(w) => Ok(Outcome::Warning(w)),
    }
  }

  // ── Rooms ─────────────────────────────────────────────────────────────────

  /// `POST /api/rooms` with the configured room name and password.
  pub async fn register(&self) -> Result<Outcome<Room>> {
    let req = self.client.post(self.url("/rooms")).json(&json!({
      "room_name": self.config.room,
      "password":  self.config.password,
    }));
    self.json(req, "POST /rooms").await
  }

  // ── Roommates ─────────────────────────────────────────────────────────────

  /// `GET /api/roommates`
  pub async fn list_roommates(&self) -> Result<Vec<Roommate>> {
    let req = self.client.get(self.url("/roommates"));
    self.json(req, "GET /roommates").await?.done()
  }

  /// `POST /api/roommates`
  pub async fn add_roommate(&self, name: &str, mobile: Option<&str>) -> Result<Outcome<Roommate>> {
    let req = self
      .client
      .post(self.url("/roommates"))
      .json(&json!({ "name": name, "mobile": mobile }));
    self.json(req, "POST /roommates").await
  }

  /// `DELETE /api/roommates/{name}[?force=true]`; yields the rows removed.
  pub async fn remove_roommate(&self, name: &str, force: bool) -> Result<Outcome<usize>> {
    let mut req = self.client.delete(self.item_url("/roommates", name)?);
    if force {
      req = req.query(&[("force", "true")]);
    }
    Ok(match self.json::<Removed>(req, "DELETE /roommates").await? {
      Outcome::Done(r) => Outcome::Done(r.removed),
      Outcome::Warning(w) => Outcome::Warning(w),
    })
  }

  // ── Expenses ──────────────────────────────────────────────────────────────

  /// `GET /api/expenses[?on=<date>][&paid_by=<name>]`
  pub async fn list_expenses(
    &self,
    on: Option<NaiveDate>,
    paid_by: Option<&str>,
  ) -> Result<Vec<Expense>> {
    let mut query = Vec::new();
    if let Some(on) = on {
      query.push(("on", on.to_string()));
    }
    if let Some(paid_by) = paid_by {
      query.push(("paid_by", paid_by.to_owned()));
    }
    let req = self.client.get(self.url("/expenses")).query(&query);
    self.json(req, "GET /expenses").await?.done()
  }

  /// `POST /api/expenses`
  pub async fn add_expense(
    &self,
    paid_by: &str,
    amount: Amount,
    date: Option<NaiveDate>,
    category: Option<Category>,
    description: Option<&str>,
  ) -> Result<Expense> {
    let req = self.client.post(self.url("/expenses")).json(&json!({
      "paid_by":     paid_by,
      "amount":      Decimal::from(amount),
      "date":        date,
      "category":    category.map(Category::as_str),
      "description": description,
    }));
    self.json(req, "POST /expenses").await?.done()
  }

  /// `DELETE /api/expenses/{id}`
  pub async fn delete_expense(&self, id: i64) -> Result<()> {
    let req = self.client.delete(self.item_url("/expenses", &id.to_string())?);
    self.send(req, "DELETE /expenses").await?.done().map(drop)
  }

  // ── Deposits ──────────────────────────────────────────────────────────────

  /// `GET /api/deposits[?from=<date>][&to=<date>]`
  pub async fn list_deposits(
    &self,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
  ) -> Result<Vec<Deposit>> {
    let query: Vec<_> = [("from", from), ("to", to)]
      .into_iter()
      .filter_map(|(k, v)| v.map(|d| (k, d.to_string())))
      .collect();
    let req = self.client.get(self.url("/deposits")).query(&query);
    self.json(req, "GET /deposits").await?.done()
  }

  /// `POST /api/deposits`
  pub async fn add_deposit(
    &self,
    roommate: &str,
    amount: Amount,
    date: Option<NaiveDate>,
  ) -> Result<Deposit> {
    let req = self.client.post(self.url("/deposits")).json(&json!({
      "roommate": roommate,
      "amount":   Decimal::from(amount),
      "date":     date,
    }));
    self.json(req, "POST /deposits").await?.done()
  }

  /// `DELETE /api/deposits/{id}`
  pub async fn delete_deposit(&self, id: i64) -> Result<()> {
    let req = self.client.delete(self.item_url("/deposits", &id.to_string())?);
    self.send(req, "DELETE /deposits").await?.done().map(drop)
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/dashboard[?today=<date>]`
  pub async fn dashboard(&self, today: Option<NaiveDate>) -> Result<Dashboard> {
    let mut req = self.client.get(self.url("/dashboard"));
    if let Some(today) = today {
      req = req.query(&[("today", today.to_string())]);
    }
    self.json(req, "GET /dashboard").await?.done()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url: base_url.to_owned(),
      room:     "flat-4b".to_owned(),
      password: "s3cret".to_owned(),
    })
    .unwrap()
  }

  #[test]
  fn urls_are_prefixed_and_encoded() {
    let c = client("http://localhost:8080/");
    assert_eq!(c.url("/expenses"), "http://localhost:8080/api/expenses");
    assert_eq!(
      c.item_url("/roommates", "Asha K").unwrap().as_str(),
      "http://localhost:8080/api/roommates/Asha%20K"
    );
  }

  #[test]
  fn outcome_done_rejects_warnings() {
    assert_eq!(Outcome::Done(3).done().unwrap(), 3);
    let err = Outcome::<()>::Warning("already exists".into()).done().unwrap_err();
    assert_eq!(err.to_string(), "already exists");
  }
}
