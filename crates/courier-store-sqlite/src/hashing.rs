//! argon2 password hashing, run off the async runtime.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash `password` into a PHC string with a fresh random salt.
pub async fn hash(password: String) -> Result<String> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| Error::PasswordHash(e.to_string()))
  })
  .await?
}

/// Check `password` against a stored PHC string.
pub async fn verify(password: String, phc: String) -> Result<bool> {
  tokio::task::spawn_blocking(move || {
    let parsed = PasswordHash::new(&phc)
      .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok(),
    )
  })
  .await?
}
