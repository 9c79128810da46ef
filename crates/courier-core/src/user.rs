//! Users of the site and the shapes they are exposed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fields accepted when registering a new user. Not `Debug`: it holds a
/// plaintext password.
#[derive(Clone, Deserialize)]
pub struct Registration {
  pub username:   String,
  pub password:   String,
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
}

impl Registration {
  /// Reject registrations that could never authenticate.
  pub fn validate(&self) -> Result<()> {
    if self.username.trim().is_empty() {
      return Err(Error::InvalidRegistration("username must not be empty"));
    }
    if self.password.is_empty() {
      return Err(Error::InvalidRegistration("password must not be empty"));
    }
    Ok(())
  }
}

/// A stored user, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub username:      String,
  pub first_name:    String,
  pub last_name:     String,
  pub phone:         String,
  pub join_at:       DateTime<Utc>,
  pub last_login_at: Option<DateTime<Utc>>,
}

/// Basic info returned by the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub username:   String,
  pub first_name: String,
  pub last_name:  String,
}

/// The other party of a message, as embedded in message listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContact {
  pub username:   String,
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
}
