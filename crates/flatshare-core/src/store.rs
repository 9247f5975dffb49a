//! The `LedgerStore` trait and supporting query and outcome types.
//!
//! The trait is implemented by storage backends (e.g.
//! `flatshare-store-sqlite`). Higher layers (`flatshare-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  ledger::{Deposit, Expense, NewDeposit, NewExpense, NewRoommate, Roommate},
  money::Money,
  period::DateRange,
  room::{NewRoom, Room, RoomId, RoomRecord},
  summary::{CategoryTotal, RoommateTotal},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`LedgerStore::list_expenses`].
#[derive(Debug, Clone, Default)]
pub struct ExpenseQuery {
  /// Restrict to a single calendar day.
  pub on:      Option<NaiveDate>,
  pub paid_by: Option<String>,
}

/// Parameters for [`LedgerStore::list_deposits`].
#[derive(Debug, Clone, Default)]
pub struct DepositQuery {
  pub range: DateRange,
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`LedgerStore::create_room`].
#[derive(Debug, Clone)]
pub enum CreateRoom {
  Created(Room),
  /// A room with this name already exists; nothing was written.
  Duplicate,
}

/// Result of [`LedgerStore::add_roommate`].
#[derive(Debug, Clone)]
pub enum AddRoommate {
  Added(Roommate),
  /// The name is already taken in this room; nothing was written.
  Duplicate,
}

/// How [`LedgerStore::remove_roommate`] treats a roommate who still has
/// expenses recorded against their name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
  /// Refuse while any expense names the roommate as payer.
  #[default]
  BlockIfExpenses,
  /// Remove anyway; historical rows keep the now-orphaned name.
  Orphan,
}

/// Result of [`LedgerStore::remove_roommate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveRoommate {
  /// Number of roommate rows deleted.
  Removed(usize),
  NotFound,
  /// Blocked by [`RemovalPolicy::BlockIfExpenses`]; carries the expense count.
  HasExpenses(u64),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Flatshare ledger backend.
///
/// Every ledger operation takes the [`RoomId`] it is scoped to; no method can
/// observe or modify another room's rows. Each write is committed on its own.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LedgerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Rooms ─────────────────────────────────────────────────────────────

  /// Persist a new room. A taken name yields [`CreateRoom::Duplicate`].
  fn create_room(
    &self,
    input: NewRoom,
  ) -> impl Future<Output = Result<CreateRoom, Self::Error>> + Send + '_;

  /// Look up a room and its credential hash by exact name.
  fn find_room(
    &self,
    room_name: String,
  ) -> impl Future<Output = Result<Option<RoomRecord>, Self::Error>> + Send + '_;

  // ── Roommates ─────────────────────────────────────────────────────────

  /// Add a roommate. A name already present in the room is a soft
  /// [`AddRoommate::Duplicate`], not an error.
  fn add_roommate(
    &self,
    room: RoomId,
    input: NewRoommate,
  ) -> impl Future<Output = Result<AddRoommate, Self::Error>> + Send + '_;

  fn list_roommates(
    &self,
    room: RoomId,
  ) -> impl Future<Output = Result<Vec<Roommate>, Self::Error>> + Send + '_;

  /// Remove every roommate row in the room whose name matches exactly.
  /// Expense and deposit rows are never touched.
  fn remove_roommate(
    &self,
    room: RoomId,
    name: String,
    policy: RemovalPolicy,
  ) -> impl Future<Output = Result<RemoveRoommate, Self::Error>> + Send + '_;

  // ── Expenses ──────────────────────────────────────────────────────────

  fn add_expense(
    &self,
    room: RoomId,
    input: NewExpense,
  ) -> impl Future<Output = Result<Expense, Self::Error>> + Send + '_;

  /// Newest first (`date DESC`, then insertion order descending).
  fn list_expenses(
    &self,
    room: RoomId,
    query: ExpenseQuery,
  ) -> impl Future<Output = Result<Vec<Expense>, Self::Error>> + Send + '_;

  /// Returns `false` if no such expense exists in the room.
  fn delete_expense(
    &self,
    room: RoomId,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Deposits ──────────────────────────────────────────────────────────

  fn add_deposit(
    &self,
    room: RoomId,
    input: NewDeposit,
  ) -> impl Future<Output = Result<Deposit, Self::Error>> + Send + '_;

  /// Newest first (`date DESC`, then insertion order descending).
  fn list_deposits(
    &self,
    room: RoomId,
    query: DepositQuery,
  ) -> impl Future<Output = Result<Vec<Deposit>, Self::Error>> + Send + '_;

  /// Returns `false` if no such deposit exists in the room.
  fn delete_deposit(
    &self,
    room: RoomId,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Aggregates ────────────────────────────────────────────────────────

  /// Sum of expense amounts dated within `range`; zero when nothing matches.
  fn expense_total(
    &self,
    room: RoomId,
    range: DateRange,
  ) -> impl Future<Output = Result<Money, Self::Error>> + Send + '_;

  /// Sum of deposit amounts dated within `range`; zero when nothing matches.
  fn deposit_total(
    &self,
    room: RoomId,
    range: DateRange,
  ) -> impl Future<Output = Result<Money, Self::Error>> + Send + '_;

  /// All-time expense totals per category, largest first.
  fn expense_totals_by_category(
    &self,
    room: RoomId,
  ) -> impl Future<Output = Result<Vec<CategoryTotal>, Self::Error>> + Send + '_;

  /// All-time expense totals per payer name, largest first.
  fn expense_totals_by_roommate(
    &self,
    room: RoomId,
  ) -> impl Future<Output = Result<Vec<RoommateTotal>, Self::Error>> + Send + '_;
}
