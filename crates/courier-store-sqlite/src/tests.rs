//! Integration tests for `SqliteStore` against an in-memory database.

use courier_core::{
  Identity,
  message::ReadState,
  policy::compose,
  store::{CourierStore, StoreError},
  user::Registration,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn registration(username: &str, password: &str) -> Registration {
  Registration {
    username:   username.into(),
    password:   password.into(),
    first_name: username.to_uppercase(),
    last_name:  "Testy".into(),
    phone:      "+14155550000".into(),
  }
}

async fn with_users(names: &[&str]) -> SqliteStore {
  let s = store().await;
  for name in names {
    s.register(registration(name, "secret123")).await.unwrap();
  }
  s
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_get_user() {
  let s = store().await;

  let user = s.register(registration("alice", "secret123")).await.unwrap();
  assert_eq!(user.username, "alice");
  assert_eq!(user.last_login_at, Some(user.join_at));

  let fetched = s.get_user("alice").await.unwrap().unwrap();
  assert_eq!(fetched.username, "alice");
  assert_eq!(fetched.first_name, "ALICE");
  assert_eq!(fetched.phone, "+14155550000");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn register_duplicate_username_fails() {
  let s = with_users(&["alice"]).await;
  let err = s.register(registration("alice", "other")).await.unwrap_err();
  assert!(matches!(
    err.as_core(),
    Some(courier_core::Error::UsernameTaken(name)) if name == "alice"
  ));
}

#[tokio::test]
async fn register_empty_password_fails() {
  let s = store().await;
  let err = s.register(registration("alice", "")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(courier_core::Error::InvalidRegistration(_))
  ));
}

#[tokio::test]
async fn authenticate_checks_password() {
  let s = with_users(&["alice"]).await;
  assert!(s.authenticate("alice", "secret123").await.unwrap());
  assert!(!s.authenticate("alice", "wrong").await.unwrap());
}

#[tokio::test]
async fn authenticate_unknown_user_is_false() {
  let s = store().await;
  assert!(!s.authenticate("ghost", "secret123").await.unwrap());
}

#[tokio::test]
async fn password_is_not_stored_in_plaintext() {
  let s = with_users(&["alice"]).await;
  let phc = s.password_hash("alice").await.unwrap().unwrap();
  assert!(phc.starts_with("$argon2"), "stored: {phc}");
  assert!(!phc.contains("secret123"));
}

#[tokio::test]
async fn update_login_timestamp_advances() {
  let s = with_users(&["alice"]).await;
  let before = s.get_user("alice").await.unwrap().unwrap().last_login_at;

  s.update_login_timestamp("alice").await.unwrap();
  let after = s.get_user("alice").await.unwrap().unwrap().last_login_at;
  assert!(after >= before);
}

#[tokio::test]
async fn update_login_timestamp_unknown_user_is_not_found() {
  let s = store().await;
  let err = s.update_login_timestamp("ghost").await.unwrap_err();
  assert!(matches!(
    err.as_core(),
    Some(courier_core::Error::UserNotFound(name)) if name == "ghost"
  ));
}

#[tokio::test]
async fn all_users_lists_basic_info() {
  let s = with_users(&["carol", "alice", "bob"]).await;
  let users = s.all_users().await.unwrap();
  let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
  assert_eq!(names, ["alice", "bob", "carol"]);
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_message() {
  let s = with_users(&["alice", "bob"]).await;
  let alice = Identity::new("alice");

  let sent = s.create_message(compose(&alice, "bob", "hi bob")).await.unwrap();
  assert_eq!(sent.from_username, "alice");
  assert_eq!(sent.to_username, "bob");
  assert_eq!(sent.read_state(), ReadState::Unread);

  let fetched = s.get_message(sent.id).await.unwrap().unwrap();
  assert_eq!(fetched, sent);
}

#[tokio::test]
async fn get_message_missing_returns_none() {
  let s = store().await;
  assert!(s.get_message(42).await.unwrap().is_none());
}

#[tokio::test]
async fn create_message_to_unknown_recipient_fails() {
  let s = with_users(&["alice"]).await;
  let err = s
    .create_message(compose(&Identity::new("alice"), "ghost", "hello?"))
    .await
    .unwrap_err();
  assert!(matches!(
    err.as_core(),
    Some(courier_core::Error::UserNotFound(name)) if name == "ghost"
  ));
}

#[tokio::test]
async fn mark_read_sets_read_at_once() {
  let s = with_users(&["alice", "bob"]).await;
  let sent = s
    .create_message(compose(&Identity::new("alice"), "bob", "hi"))
    .await
    .unwrap();

  let first = s.mark_read(sent.id).await.unwrap().unwrap();
  let at = first.read_at.expect("read_at set");

  let second = s.mark_read(sent.id).await.unwrap().unwrap();
  assert_eq!(second.read_at, Some(at), "re-marking must keep the first timestamp");

  let fetched = s.get_message(sent.id).await.unwrap().unwrap();
  assert!(fetched.read_state().is_read());
}

#[tokio::test]
async fn mark_read_missing_returns_none() {
  let s = store().await;
  assert!(s.mark_read(7).await.unwrap().is_none());
}

#[tokio::test]
async fn messages_from_and_to_embed_other_party() {
  let s = with_users(&["alice", "bob", "carol"]).await;
  let alice = Identity::new("alice");
  let carol = Identity::new("carol");

  s.create_message(compose(&alice, "bob", "one")).await.unwrap();
  s.create_message(compose(&alice, "carol", "two")).await.unwrap();
  s.create_message(compose(&carol, "alice", "three")).await.unwrap();

  let sent = s.messages_from("alice").await.unwrap();
  assert_eq!(sent.len(), 2);
  assert_eq!(sent[0].to_user.username, "bob");
  assert_eq!(sent[1].to_user.username, "carol");
  assert_eq!(sent[1].body, "two");

  let received = s.messages_to("alice").await.unwrap();
  assert_eq!(received.len(), 1);
  assert_eq!(received[0].from_user.username, "carol");
  assert_eq!(received[0].from_user.first_name, "CAROL");
  assert!(received[0].read_at.is_none());
}
