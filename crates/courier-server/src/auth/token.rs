//! Signed, stateless identity tokens.
//!
//! Format: `v1.<payload>.<signature>`, both parts base64url without padding.
//! The payload is the JSON object `{"username": …, "iat": …}` and the
//! signature is HMAC-SHA256 over `v1.<payload>` keyed with the server secret.
//!
//! Tokens carry no expiry and there is no revocation list. Changing the
//! secret invalidates every token issued under the old one.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::Utc;
use courier_core::Identity;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const VERSION: &str = "v1";

/// The signing secret cannot be used. Fatal at startup.
#[derive(Debug, Error)]
pub enum KeyError {
  #[error("signing secret is empty")]
  Empty,
  #[error("signing secret rejected: {0}")]
  Invalid(String),
}

/// The part of the payload verification cares about. `iat` is informational.
#[derive(Deserialize)]
struct Claims {
  username: String,
}

/// Issues and verifies tokens with a fixed, process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
  mac: HmacSha256,
}

impl TokenCodec {
  pub fn new(secret: &str) -> Result<Self, KeyError> {
    if secret.is_empty() {
      return Err(KeyError::Empty);
    }
    let mac = HmacSha256::new_from_slice(secret.as_bytes())
      .map_err(|e| KeyError::Invalid(e.to_string()))?;
    Ok(Self { mac })
  }

  /// Issue a token naming `username`.
  pub fn issue(&self, username: &str) -> String {
    let claims = json!({ "username": username, "iat": Utc::now().timestamp() });
    self.sign(claims.to_string().as_bytes())
  }

  /// Check a token's signature and shape.
  ///
  /// Any failure is reported as `None`: malformed input, a bad signature
  /// and a payload without a usable `username` all look the same.
  pub fn verify(&self, token: &str) -> Option<Identity> {
    let (signed, signature) = token.rsplit_once('.')?;
    let (version, payload) = signed.split_once('.')?;
    if version != VERSION {
      return None;
    }

    let signature = B64.decode(signature).ok()?;
    let mut mac = self.mac.clone();
    mac.update(signed.as_bytes());
    // Constant-time comparison.
    mac.verify_slice(&signature).ok()?;

    let payload = B64.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&payload).ok()?;
    if claims.username.is_empty() {
      return None;
    }
    Some(Identity::new(claims.username))
  }

  fn sign(&self, payload: &[u8]) -> String {
    let signed = format!("{VERSION}.{}", B64.encode(payload));
    let mut mac = self.mac.clone();
    mac.update(signed.as_bytes());
    let signature = B64.encode(mac.finalize().into_bytes());
    format!("{signed}.{signature}")
  }
}
