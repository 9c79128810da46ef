//! [`SqliteStore`] — the SQLite implementation of [`CourierStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use courier_core::{
  message::{Message, NewMessage, ReceivedMessage, SentMessage},
  store::CourierStore,
  user::{Registration, User, UserSummary},
};

use crate::{
  encode::{encode_dt, RawListedMessage, RawMessage, RawUser, MESSAGE_COLUMNS},
  hashing,
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Courier store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// runs on the connection's single worker thread, so each `call` closure is
/// atomic with respect to every other.
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

  /// Fetch the stored password hash for `username`, if the user exists.
  pub(crate) async fn password_hash(&self, username: &str) -> Result<Option<String>> {
    let username = username.to_owned();
    let hash = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT password FROM users WHERE username = ?1",
              rusqlite::params![username],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(hash)
  }

  /// Run one of the joined message listings. `sql` must select the columns
  /// [`RawListedMessage::from_row`] reads, bound to `?1 = username`.
  async fn listed_messages(
    &self,
    sql:      &'static str,
    username: &str,
  ) -> Result<Vec<RawListedMessage>> {
    let username = username.to_owned();
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![username], RawListedMessage::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── CourierStore impl ───────────────────────────────────────────────────────

impl CourierStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register(&self, registration: Registration) -> Result<User> {
    registration.validate()?;

    let hash = hashing::hash(registration.password.clone()).await?;
    let now  = Utc::now();

    let user = User {
      username:      registration.username,
      first_name:    registration.first_name,
      last_name:     registration.last_name,
      phone:         registration.phone,
      join_at:       now,
      last_login_at: Some(now),
    };

    let username   = user.username.clone();
    let first_name = user.first_name.clone();
    let last_name  = user.last_name.clone();
    let phone      = user.phone.clone();
    let at_str     = encode_dt(now);

    let inserted = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO users (
             username, password, first_name, last_name, phone,
             join_at, last_login_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![username, hash, first_name, last_name, phone, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(courier_core::Error::UsernameTaken(user.username).into());
    }
    Ok(user)
  }

  async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
    match self.password_hash(username).await? {
      Some(phc) => hashing::verify(password.to_owned(), phc).await,
      None      => Ok(false),
    }
  }

  async fn update_login_timestamp(&self, username: &str) -> Result<()> {
    let name   = username.to_owned();
    let at_str = encode_dt(Utc::now());

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET last_login_at = ?2 WHERE username = ?1",
          rusqlite::params![name, at_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(courier_core::Error::UserNotFound(username.to_owned()).into());
    }
    Ok(())
  }

  async fn all_users(&self) -> Result<Vec<UserSummary>> {
    let users = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT username, first_name, last_name FROM users ORDER BY username",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(UserSummary {
              username:   row.get(0)?,
              first_name: row.get(1)?,
              last_name:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(users)
  }

  async fn get_user(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT username, first_name, last_name, phone, join_at, last_login_at
             FROM users WHERE username = ?1",
            rusqlite::params![username],
            |row| {
              Ok(RawUser {
                username:      row.get(0)?,
                first_name:    row.get(1)?,
                last_name:     row.get(2)?,
                phone:         row.get(3)?,
                join_at:       row.get(4)?,
                last_login_at: row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>> {
    self
      .listed_messages(
        "SELECT m.id, m.body, m.sent_at, m.read_at,
                u.username, u.first_name, u.last_name, u.phone
         FROM messages AS m
         JOIN users AS u ON m.to_username = u.username
         WHERE m.from_username = ?1
         ORDER BY m.id",
        username,
      )
      .await?
      .into_iter()
      .map(RawListedMessage::into_sent)
      .collect()
  }

  async fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>> {
    self
      .listed_messages(
        "SELECT m.id, m.body, m.sent_at, m.read_at,
                u.username, u.first_name, u.last_name, u.phone
         FROM messages AS m
         JOIN users AS u ON m.from_username = u.username
         WHERE m.to_username = ?1
         ORDER BY m.id",
        username,
      )
      .await?
      .into_iter()
      .map(RawListedMessage::into_received)
      .collect()
  }

  // ── Messages ──────────────────────────────────────────────────────────────

  async fn create_message(&self, message: NewMessage) -> Result<Message> {
    let sent_at = Utc::now();

    let from    = message.from_username().to_owned();
    let to      = message.to_username().to_owned();
    let body    = message.body().to_owned();
    let at_str  = encode_dt(sent_at);

    // Err(username) names the first party that does not exist.
    let outcome: std::result::Result<i64, String> = self
      .conn
      .call(move |conn| {
        for username in [&to, &from] {
          let exists = conn
            .query_row(
              "SELECT 1 FROM users WHERE username = ?1",
              rusqlite::params![username],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          if !exists {
            return Ok(Err(username.clone()));
          }
        }

        conn.execute(
          "INSERT INTO messages (from_username, to_username, body, sent_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![from, to, body, at_str],
        )?;
        Ok(Ok(conn.last_insert_rowid()))
      })
      .await?;

    let id = outcome.map_err(courier_core::Error::UserNotFound)?;

    Ok(Message {
      id,
      from_username: message.from_username().to_owned(),
      to_username:   message.to_username().to_owned(),
      body:          message.body().to_owned(),
      sent_at,
      read_at:       None,
    })
  }

  async fn get_message(&self, id: i64) -> Result<Option<Message>> {
    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
            rusqlite::params![id],
            RawMessage::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }

  async fn mark_read(&self, id: i64) -> Result<Option<Message>> {
    let at_str = encode_dt(Utc::now());

    // COALESCE keeps the first timestamp, so racing calls cannot move it.
    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE messages SET read_at = COALESCE(read_at, ?2)
               WHERE id = ?1
               RETURNING {MESSAGE_COLUMNS}"
            ),
            rusqlite::params![id, at_str],
            RawMessage::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }
}
