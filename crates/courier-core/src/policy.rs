//! Message ownership rules.
//!
//! These run after the caller has already been authenticated. They decide
//! what a specific identity may do with a specific message.

use crate::{Error, Identity, Result, message::{Message, NewMessage}};

/// Senders and recipients may read a message; nobody else may.
pub fn authorize_read(identity: &Identity, message: &Message) -> Result<()> {
  if message.involves(identity.username()) {
    Ok(())
  } else {
    Err(Error::Unauthorized(Some(
      "may only read messages you sent or received",
    )))
  }
}

/// Only the recipient may mark a message read. The sender may not, even
/// though the sender can read it.
pub fn authorize_mark_read(identity: &Identity, message: &Message) -> Result<()> {
  if identity.is(&message.to_username) {
    Ok(())
  } else {
    Err(Error::Unauthorized(Some("only the recipient may mark as read")))
  }
}

/// Build a new message sent by `identity`.
///
/// The sender is taken from the identity. There is no way to supply it.
pub fn compose(
  identity:    &Identity,
  to_username: impl Into<String>,
  body:        impl Into<String>,
) -> NewMessage {
  NewMessage {
    from_username: identity.username().to_owned(),
    to_username:   to_username.into(),
    body:          body.into(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::message::ReadState;

  fn message(read: bool) -> Message {
    Message {
      id:            1,
      from_username: "alice".into(),
      to_username:   "bob".into(),
      body:          "hi".into(),
      sent_at:       Utc::now(),
      read_at:       read.then(Utc::now),
    }
  }

  #[test]
  fn sender_and_recipient_may_read() {
    let m = message(false);
    assert!(authorize_read(&Identity::new("alice"), &m).is_ok());
    assert!(authorize_read(&Identity::new("bob"), &m).is_ok());
  }

  #[test]
  fn third_party_may_not_read() {
    let m = message(true);
    assert!(matches!(
      authorize_read(&Identity::new("carol"), &m),
      Err(Error::Unauthorized(Some(_)))
    ));
  }

  #[test]
  fn username_match_is_exact() {
    let m = message(false);
    assert!(authorize_read(&Identity::new("Alice"), &m).is_err());
    assert!(authorize_read(&Identity::new("bob "), &m).is_err());
  }

  #[test]
  fn only_recipient_may_mark_read() {
    let m = message(false);
    assert!(authorize_mark_read(&Identity::new("bob"), &m).is_ok());
    assert!(authorize_mark_read(&Identity::new("alice"), &m).is_err());
    assert!(authorize_mark_read(&Identity::new("carol"), &m).is_err());
  }

  #[test]
  fn recipient_may_mark_already_read_message() {
    let m = message(true);
    assert!(authorize_mark_read(&Identity::new("bob"), &m).is_ok());
  }

  #[test]
  fn compose_takes_sender_from_identity() {
    let new = compose(&Identity::new("alice"), "bob", "hello");
    assert_eq!(new.from_username(), "alice");
    assert_eq!(new.to_username(), "bob");
    assert_eq!(new.body(), "hello");
  }

  #[test]
  fn read_state_follows_read_at() {
    assert_eq!(message(false).read_state(), ReadState::Unread);
    assert!(message(true).read_state().is_read());
  }
}
