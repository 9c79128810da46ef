//! Error type for `courier-store-sqlite`.

use courier_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] courier_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored hash could not be parsed, or hashing itself failed.
  #[error("password hash error: {0}")]
  PasswordHash(String),

  #[error("blocking task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

impl StoreError for Error {
  fn as_core(&self) -> Option<&courier_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
