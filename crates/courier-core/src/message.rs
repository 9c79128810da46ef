//! Messages exchanged between users.
//!
//! A message is created once and never deleted. The only mutation is the
//! one-way `read_at` transition performed by its recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserContact;

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub id:            i64,
  pub from_username: String,
  pub to_username:   String,
  pub body:          String,
  pub sent_at:       DateTime<Utc>,
  pub read_at:       Option<DateTime<Utc>>,
}

impl Message {
  pub fn read_state(&self) -> ReadState {
    match self.read_at {
      Some(at) => ReadState::Read { at },
      None     => ReadState::Unread,
    }
  }

  /// True when `username` is the sender or the recipient.
  pub fn involves(&self, username: &str) -> bool {
    self.from_username == username || self.to_username == username
  }
}

/// Read status of a message. `Read` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReadState {
  Unread,
  Read { at: DateTime<Utc> },
}

impl ReadState {
  pub fn is_read(&self) -> bool { matches!(self, Self::Read { .. }) }
}

/// Input to [`CourierStore::create_message`](crate::store::CourierStore::create_message).
///
/// Only [`policy::compose`](crate::policy::compose) builds one, so the sender
/// always comes from an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
  pub(crate) from_username: String,
  pub(crate) to_username:   String,
  pub(crate) body:          String,
}

impl NewMessage {
  pub fn from_username(&self) -> &str { &self.from_username }

  pub fn to_username(&self) -> &str { &self.to_username }

  pub fn body(&self) -> &str { &self.body }
}

/// A message as seen from its sender's outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
  pub id:      i64,
  pub to_user: UserContact,
  pub body:    String,
  pub sent_at: DateTime<Utc>,
  pub read_at: Option<DateTime<Utc>>,
}

/// A message as seen from its recipient's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessage {
  pub id:        i64,
  pub from_user: UserContact,
  pub body:      String,
  pub sent_at:   DateTime<Utc>,
  pub read_at:   Option<DateTime<Utc>>,
}
