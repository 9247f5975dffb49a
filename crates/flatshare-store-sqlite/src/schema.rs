//! SQL schema for the Flatshare SQLite store.
//!
//! Executed once at connection startup. Versioned via `PRAGMA user_version`;
//! there is no migration path from older layouts.

/// Full schema DDL; idempotent thanks to `CREATE … IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS rooms (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    room_name     TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,    -- argon2 PHC string, never plaintext
    created_at    TEXT NOT NULL     -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS roommates (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id INTEGER NOT NULL REFERENCES rooms(id),
    name    TEXT NOT NULL,
    mobile  TEXT,
    UNIQUE (room_id, name)
);

-- paid_by and roommate hold a name, not a roommates.id: removing a roommate
-- leaves these rows as they were.
-- amount is in minor units (hundredths); date is YYYY-MM-DD so that
-- string comparison is date comparison.
CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id     INTEGER NOT NULL REFERENCES rooms(id),
    paid_by     TEXT NOT NULL,
    amount      INTEGER NOT NULL CHECK (amount > 0),
    date        TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT 'others',
    description TEXT
);

CREATE TABLE IF NOT EXISTS deposits (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id  INTEGER NOT NULL REFERENCES rooms(id),
    roommate TEXT NOT NULL,
    amount   INTEGER NOT NULL CHECK (amount > 0),
    date     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS expenses_room_date_idx  ON expenses(room_id, date);
CREATE INDEX IF NOT EXISTS expenses_paid_by_idx    ON expenses(room_id, paid_by);
CREATE INDEX IF NOT EXISTS deposits_room_date_idx  ON deposits(room_id, date);
CREATE INDEX IF NOT EXISTS deposits_roommate_idx   ON deposits(room_id, roommate);

PRAGMA user_version = 1;
";
