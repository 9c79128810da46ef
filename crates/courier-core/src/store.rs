//! The `CourierStore` trait: the persistence collaborator for users and
//! messages.
//!
//! The trait is implemented by storage backends (e.g. `courier-store-sqlite`).
//! The HTTP layer (`courier-server`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  message::{Message, NewMessage, ReceivedMessage, SentMessage},
  user::{Registration, User, UserSummary},
};

/// Errors produced by a store backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain failure behind this error, if it is one.
  ///
  /// Backend-internal failures (I/O, corrupt rows) return `None`.
  fn as_core(&self) -> Option<&crate::Error>;
}

/// Abstraction over a Courier store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CourierStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Hash the password and persist a new user. `join_at` and
  /// `last_login_at` are set to now.
  ///
  /// Fails with [`Error::UsernameTaken`](crate::Error::UsernameTaken) if the
  /// username is in use.
  fn register(
    &self,
    registration: Registration,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Is this username/password pair valid? Unknown users are simply `false`.
  fn authenticate<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Set `last_login_at` to now.
  ///
  /// Fails with [`Error::UserNotFound`](crate::Error::UserNotFound) if the
  /// user does not exist.
  fn update_login_timestamp<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Basic info on all users.
  fn all_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserSummary>, Self::Error>> + Send + '_;

  /// Retrieve a user by username. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Messages sent by `username`, each with its recipient's contact info.
  fn messages_from<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Vec<SentMessage>, Self::Error>> + Send + 'a;

  /// Messages received by `username`, each with its sender's contact info.
  fn messages_to<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Vec<ReceivedMessage>, Self::Error>> + Send + 'a;

  // ── Messages ──────────────────────────────────────────────────────────

  /// Persist a new, unread message. `sent_at` is set by the store.
  ///
  /// Fails with [`Error::UserNotFound`](crate::Error::UserNotFound) if the
  /// recipient does not exist.
  fn create_message(
    &self,
    message: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Retrieve a message by id. Returns `None` if not found.
  fn get_message(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// Set `read_at` to now unless it is already set, atomically.
  ///
  /// Marking an already-read message is a no-op that keeps the original
  /// timestamp. Returns `None` if the message does not exist.
  fn mark_read(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;
}
