//! Error types for `courier-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The identity failed an ownership predicate. The reason is a diagnostic
  /// only; callers may drop it.
  #[error("unauthorized")]
  Unauthorized(Option<&'static str>),

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("username already taken: {0}")]
  UsernameTaken(String),

  #[error("invalid registration: {0}")]
  InvalidRegistration(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
