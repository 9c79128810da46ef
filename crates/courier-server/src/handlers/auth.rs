//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Body: `{"username","password"}`; returns `{"token"}` |
//! | `POST` | `/auth/register` | Body: [`Registration`]; returns `{"token"}` |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use courier_core::{store::CourierStore, user::Registration};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Not `Debug`: it holds a plaintext password.
#[derive(Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
  pub token: String,
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let Json(body) = body?;

  let valid = state
    .store
    .authenticate(&body.username, &body.password)
    .await
    .map_err(ApiError::store)?;
  if !valid {
    tracing::info!(username = %body.username, "login rejected");
    return Err(ApiError::Unauthorized(Some("invalid username/password")));
  }

  state
    .store
    .update_login_timestamp(&body.username)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(username = %body.username, "logged in");
  Ok(Json(TokenResponse { token: state.tokens.issue(&body.username) }))
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /auth/register` — registers, logs in, and returns a token.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<Registration>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let Json(registration) = body?;

  // Registration stamps last_login_at itself.
  let user = state
    .store
    .register(registration)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(username = %user.username, "registered");
  Ok(Json(TokenResponse { token: state.tokens.issue(&user.username) }))
}
