//! HTTP surface for Courier.
//!
//! Exposes an axum [`Router`] backed by any [`CourierStore`], with token
//! authentication and per-message access control applied in front of the
//! handlers.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod seed;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  middleware,
  routing::{get, post},
};
use courier_core::store::CourierStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{TokenCodec, resolver::resolve_identity};
use handlers::{messages, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `COURIER_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// HMAC key for tokens. Changing it logs everyone out.
  pub secret_key: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CourierStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub tokens: Arc<TokenCodec>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the Courier server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let tokens = state.tokens.clone();

  Router::new()
    .route("/auth/login",             post(handlers::auth::login::<S>))
    .route("/auth/register",          post(handlers::auth::register::<S>))
    .route("/users",                  get(users::list::<S>))
    .route("/users/{username}",       get(users::get_one::<S>))
    .route("/users/{username}/to",    get(users::messages_to::<S>))
    .route("/users/{username}/from",  get(users::messages_from::<S>))
    .route("/messages",               post(messages::create::<S>))
    .route("/messages/{id}",          get(messages::get_one::<S>))
    .route("/messages/{id}/read",     post(messages::mark_read::<S>))
    .layer(middleware::from_fn_with_state(tokens, resolve_identity))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
