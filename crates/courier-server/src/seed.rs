//! Demo data for a fresh database.

use courier_core::{Identity, policy, store::CourierStore, user::Registration};

const USERS: [&str; 3] = ["Justin", "Jimmy", "Dave"];

const MESSAGES: [(&str, &str, &str); 3] = [
  ("Justin", "Jimmy", "Hi"),
  ("Justin", "Dave", "Hi"),
  ("Dave", "Justin", "Hi"),
];

/// Register three users (password `pass`) and send three messages between
/// them.
pub async fn seed<S: CourierStore>(store: &S) -> Result<(), S::Error> {
  for name in USERS {
    store
      .register(Registration {
        username:   name.to_owned(),
        password:   "pass".to_owned(),
        first_name: name.to_owned(),
        last_name:  "Clark".to_owned(),
        phone:      "123456".to_owned(),
      })
      .await?;
  }

  for (from, to, body) in MESSAGES {
    store
      .create_message(policy::compose(&Identity::new(from), to, body))
      .await?;
  }

  tracing::info!(users = USERS.len(), messages = MESSAGES.len(), "seeded database");
  Ok(())
}
