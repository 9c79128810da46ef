//! Identity — the authenticated subject attached to a single request.

use std::fmt;

/// An authenticated user, produced only by successful token verification.
///
/// Immutable once constructed; the subject is the user's unique username.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
  username: String,
}

impl Identity {
  pub fn new(username: impl Into<String>) -> Self {
    Self { username: username.into() }
  }

  pub fn username(&self) -> &str { &self.username }

  /// True when this identity refers to `username`.
  pub fn is(&self, username: &str) -> bool { self.username == username }
}

impl fmt::Display for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.username)
  }
}
