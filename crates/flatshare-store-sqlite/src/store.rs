//! [`SqliteStore`] — the SQLite implementation of [`LedgerStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, warn};

use flatshare_core::{
  ledger::{Deposit, Expense, NewDeposit, NewExpense, NewRoommate, Roommate},
  money::Money,
  period::DateRange,
  room::{NewRoom, Room, RoomId, RoomRecord},
  store::{
    AddRoommate, CreateRoom, DepositQuery, ExpenseQuery, LedgerStore, RemovalPolicy,
    RemoveRoommate,
  },
  summary::{CategoryTotal, RoommateTotal},
};

use crate::{
  Result,
  encode::{
    RawDeposit, RawExpense, RawRoom, decode_category_total, encode_date, encode_dt,
    encode_range, roommate_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Flatshare ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// borrows the connection for one statement (or one short transaction) and
/// commits before returning.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// `SUM(amount)` over `table` for one room and an inclusive date window.
  async fn sum_amount(
    &self,
    table: &'static str,
    room: RoomId,
    range: DateRange,
  ) -> Result<Money> {
    let (lo, hi) = encode_range(range);

    let minor: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "SELECT COALESCE(SUM(amount), 0) FROM {table}
             WHERE room_id = ?1 AND date BETWEEN ?2 AND ?3"
          ),
          rusqlite::params![room.0, lo, hi],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(Money::from_minor(minor))
  }

  /// Delete one row by id, scoped to `room`.
  async fn delete_row(&self, table: &'static str, room: RoomId, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE room_id = ?1 AND id = ?2"),
          rusqlite::params![room.0, id],
        )?)
      })
      .await?;

    debug!(%room, table, id, deleted, "delete row");
    Ok(deleted > 0)
  }
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  type Error = crate::Error;

  // ── Rooms ─────────────────────────────────────────────────────────────────

  async fn create_room(&self, input: NewRoom) -> Result<CreateRoom> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let name = input.room_name.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO rooms (room_name, password_hash, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (room_name) DO NOTHING",
          rusqlite::params![input.room_name, input.password_hash, at_str],
        )?;
        Ok((inserted > 0).then(|| conn.last_insert_rowid()))
      })
      .await?;

    match id {
      Some(id) => {
        debug!(room_id = id, room_name = %name, "room created");
        Ok(CreateRoom::Created(Room { room_id: RoomId(id), room_name: name, created_at }))
      }
      None => {
        warn!(room_name = %name, "room name already taken");
        Ok(CreateRoom::Duplicate)
      }
    }
  }

  async fn find_room(&self, room_name: String) -> Result<Option<RoomRecord>> {
    let raw: Option<RawRoom> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, room_name, password_hash, created_at FROM rooms WHERE room_name = ?1",
            rusqlite::params![room_name],
            |row| {
              Ok(RawRoom {
                id:            row.get(0)?,
                room_name:     row.get(1)?,
                password_hash: row.get(2)?,
                created_at:    row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRoom::into_record).transpose()
  }

  // ── Roommates ─────────────────────────────────────────────────────────────

  async fn add_roommate(&self, room: RoomId, input: NewRoommate) -> Result<AddRoommate> {
    let NewRoommate { name, mobile } = input;
    let (name_col, mobile_col) = (name.clone(), mobile.clone());

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO roommates (room_id, name, mobile) VALUES (?1, ?2, ?3)
           ON CONFLICT (room_id, name) DO NOTHING",
          rusqlite::params![room.0, name_col, mobile_col],
        )?;
        Ok((inserted > 0).then(|| conn.last_insert_rowid()))
      })
      .await?;

    match id {
      Some(id) => {
        debug!(%room, roommate = %name, "roommate added");
        Ok(AddRoommate::Added(Roommate { id, name, mobile }))
      }
      None => {
        warn!(%room, roommate = %name, "duplicate roommate name ignored");
        Ok(AddRoommate::Duplicate)
      }
    }
  }

  async fn list_roommates(&self, room: RoomId) -> Result<Vec<Roommate>> {
    let roommates = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, mobile FROM roommates WHERE room_id = ?1 ORDER BY name, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![room.0], roommate_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(roommates)
  }

  async fn remove_roommate(
    &self,
    room: RoomId,
    name: String,
    policy: RemovalPolicy,
  ) -> Result<RemoveRoommate> {
    let log_name = name.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        // The check and the delete must observe the same state.
        let tx = conn.transaction()?;

        let present: i64 = tx.query_row(
          "SELECT COUNT(*) FROM roommates WHERE room_id = ?1 AND name = ?2",
          rusqlite::params![room.0, name],
          |row| row.get(0),
        )?;
        if present == 0 {
          return Ok(RemoveRoommate::NotFound);
        }

        if policy == RemovalPolicy::BlockIfExpenses {
          let expenses: i64 = tx.query_row(
            "SELECT COUNT(*) FROM expenses WHERE room_id = ?1 AND paid_by = ?2",
            rusqlite::params![room.0, name],
            |row| row.get(0),
          )?;
          if expenses > 0 {
            return Ok(RemoveRoommate::HasExpenses(expenses.unsigned_abs()));
          }
        }

        let removed = tx.execute(
          "DELETE FROM roommates WHERE room_id = ?1 AND name = ?2",
          rusqlite::params![room.0, name],
        )?;
        tx.commit()?;
        Ok(RemoveRoommate::Removed(removed))
      })
      .await?;

    match outcome {
      RemoveRoommate::HasExpenses(n) => {
        warn!(%room, roommate = %log_name, expenses = n, "removal blocked by expenses");
      }
      other => debug!(%room, roommate = %log_name, ?other, "remove roommate"),
    }
    Ok(outcome)
  }

  // ── Expenses ──────────────────────────────────────────────────────────────

  async fn add_expense(&self, room: RoomId, input: NewExpense) -> Result<Expense> {
    let paid_by     = input.paid_by.clone();
    let amount      = input.amount.minor();
    let date_str    = encode_date(input.date);
    let category    = input.category.as_str();
    let description = input.description.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO expenses (room_id, paid_by, amount, date, category, description)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![room.0, paid_by, amount, date_str, category, description],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(%room, id, amount = %input.amount, date = %input.date, "expense added");
    Ok(Expense {
      id,
      paid_by:     input.paid_by,
      amount:      input.amount,
      date:        input.date,
      category:    input.category,
      description: input.description,
    })
  }

  async fn list_expenses(&self, room: RoomId, query: ExpenseQuery) -> Result<Vec<Expense>> {
    let on_str  = query.on.map(encode_date);
    let paid_by = query.paid_by;

    let raws: Vec<RawExpense> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM expenses
           WHERE room_id = ?1
             AND (?2 IS NULL OR date = ?2)
             AND (?3 IS NULL OR paid_by = ?3)
           ORDER BY date DESC, id DESC",
          RawExpense::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![room.0, on_str, paid_by], RawExpense::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExpense::into_expense).collect()
  }

  async fn delete_expense(&self, room: RoomId, id: i64) -> Result<bool> {
    self.delete_row("expenses", room, id).await
  }

  // ── Deposits ──────────────────────────────────────────────────────────────

  async fn add_deposit(&self, room: RoomId, input: NewDeposit) -> Result<Deposit> {
    let roommate = input.roommate.clone();
    let amount   = input.amount.minor();
    let date_str = encode_date(input.date);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO deposits (room_id, roommate, amount, date) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![room.0, roommate, amount, date_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(%room, id, amount = %input.amount, date = %input.date, "deposit added");
    Ok(Deposit {
      id,
      roommate: input.roommate,
      amount:   input.amount,
      date:     input.date,
    })
  }

  async fn list_deposits(&self, room: RoomId, query: DepositQuery) -> Result<Vec<Deposit>> {
    let (lo, hi) = encode_range(query.range);

    let raws: Vec<RawDeposit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM deposits
           WHERE room_id = ?1 AND date BETWEEN ?2 AND ?3
           ORDER BY date DESC, id DESC",
          RawDeposit::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![room.0, lo, hi], RawDeposit::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDeposit::into_deposit).collect()
  }

  async fn delete_deposit(&self, room: RoomId, id: i64) -> Result<bool> {
    self.delete_row("deposits", room, id).await
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn expense_total(&self, room: RoomId, range: DateRange) -> Result<Money> {
    self.sum_amount("expenses", room, range).await
  }

  async fn deposit_total(&self, room: RoomId, range: DateRange) -> Result<Money> {
    self.sum_amount("deposits", room, range).await
  }

  async fn expense_totals_by_category(&self, room: RoomId) -> Result<Vec<CategoryTotal>> {
    let raws: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT category, SUM(amount) AS total FROM expenses
           WHERE room_id = ?1
           GROUP BY category
           ORDER BY total DESC, category",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![room.0], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(decode_category_total).collect()
  }

  async fn expense_totals_by_roommate(&self, room: RoomId) -> Result<Vec<RoommateTotal>> {
    let raws: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT paid_by, SUM(amount) AS total FROM expenses
           WHERE room_id = ?1
           GROUP BY paid_by
           ORDER BY total DESC, paid_by",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![room.0], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(|(roommate, total)| RoommateTotal { roommate, total: Money::from_minor(total) })
        .collect(),
    )
  }
}
