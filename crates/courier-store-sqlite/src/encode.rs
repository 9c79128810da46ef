//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use courier_core::{
  message::{Message, ReceivedMessage, SentMessage},
  user::{User, UserContact},
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Column values for `SELECT username, first_name, last_name, phone, join_at,
/// last_login_at FROM users`.
pub struct RawUser {
  pub username:      String,
  pub first_name:    String,
  pub last_name:     String,
  pub phone:         String,
  pub join_at:       String,
  pub last_login_at: Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      username:      self.username,
      first_name:    self.first_name,
      last_name:     self.last_name,
      phone:         self.phone,
      join_at:       decode_dt(&self.join_at)?,
      last_login_at: decode_opt_dt(self.last_login_at)?,
    })
  }
}

/// Column values for a full `messages` row.
pub struct RawMessage {
  pub id:            i64,
  pub from_username: String,
  pub to_username:   String,
  pub body:          String,
  pub sent_at:       String,
  pub read_at:       Option<String>,
}

pub const MESSAGE_COLUMNS: &str =
  "id, from_username, to_username, body, sent_at, read_at";

impl RawMessage {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawMessage {
      id:            row.get(0)?,
      from_username: row.get(1)?,
      to_username:   row.get(2)?,
      body:          row.get(3)?,
      sent_at:       row.get(4)?,
      read_at:       row.get(5)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      id:            self.id,
      from_username: self.from_username,
      to_username:   self.to_username,
      body:          self.body,
      sent_at:       decode_dt(&self.sent_at)?,
      read_at:       decode_opt_dt(self.read_at)?,
    })
  }
}

/// A message joined with the user on the other side of it.
pub struct RawListedMessage {
  pub id:      i64,
  pub body:    String,
  pub sent_at: String,
  pub read_at: Option<String>,
  pub other:   UserContact,
}

impl RawListedMessage {
  /// Reads `m.id, m.body, m.sent_at, m.read_at, u.username, u.first_name,
  /// u.last_name, u.phone`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawListedMessage {
      id:      row.get(0)?,
      body:    row.get(1)?,
      sent_at: row.get(2)?,
      read_at: row.get(3)?,
      other:   UserContact {
        username:   row.get(4)?,
        first_name: row.get(5)?,
        last_name:  row.get(6)?,
        phone:      row.get(7)?,
      },
    })
  }

  pub fn into_sent(self) -> Result<SentMessage> {
    Ok(SentMessage {
      id:      self.id,
      to_user: self.other,
      body:    self.body,
      sent_at: decode_dt(&self.sent_at)?,
      read_at: decode_opt_dt(self.read_at)?,
    })
  }

  pub fn into_received(self) -> Result<ReceivedMessage> {
    Ok(ReceivedMessage {
      id:        self.id,
      from_user: self.other,
      body:      self.body,
      sent_at:   decode_dt(&self.sent_at)?,
      read_at:   decode_opt_dt(self.read_at)?,
    })
  }
}
