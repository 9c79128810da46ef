//! SQL schema for the Courier SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    username      TEXT PRIMARY KEY,
    password      TEXT NOT NULL,   -- argon2 PHC string
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    phone         TEXT NOT NULL,
    join_at       TEXT NOT NULL,   -- ISO 8601 UTC
    last_login_at TEXT
);

-- Messages are never deleted. read_at moves from NULL to a timestamp once.
CREATE TABLE IF NOT EXISTS messages (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    from_username TEXT NOT NULL REFERENCES users(username),
    to_username   TEXT NOT NULL REFERENCES users(username),
    body          TEXT NOT NULL,
    sent_at       TEXT NOT NULL,
    read_at       TEXT
);

CREATE INDEX IF NOT EXISTS messages_from_idx ON messages(from_username);
CREATE INDEX IF NOT EXISTS messages_to_idx   ON messages(to_username);

PRAGMA user_version = 1;
";
