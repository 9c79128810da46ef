//! Handlers for `/messages` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/messages/{id}` | Sender or recipient only |
//! | `POST` | `/messages` | Body: `{"to_username","body"}`; sender is the caller |
//! | `POST` | `/messages/{id}/read` | Recipient only; repeat calls keep the first `read_at` |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use courier_core::{message::Message, policy, store::CourierStore};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
  pub message: Message,
}

/// Body of `POST /messages`. Any `from_username` the client sends is ignored.
#[derive(Debug, Deserialize)]
pub struct SendBody {
  pub to_username: String,
  pub body:        String,
}

async fn fetch<S>(state: &AppState<S>, id: i64) -> Result<Message, ApiError>
where
  S: CourierStore,
{
  state
    .store
    .get_message(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("message {id} not found")))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /messages/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Authenticated(identity): Authenticated,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let Path(id) = path?;
  let message = fetch(&state, id).await?;
  policy::authorize_read(&identity, &message)?;
  Ok(Json(MessageResponse { message }))
}

// ─── Send ─────────────────────────────────────────────────────────────────────

/// `POST /messages` — returns the stored message.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(identity): Authenticated,
  body: Result<Json<SendBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let Json(body) = body?;

  let message = state
    .store
    .create_message(policy::compose(&identity, body.to_username, body.body))
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    id = message.id,
    from = %message.from_username,
    to = %message.to_username,
    "message sent"
  );
  Ok(Json(MessageResponse { message }))
}

// ─── Mark read ────────────────────────────────────────────────────────────────

/// `POST /messages/{id}/read`
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  Authenticated(identity): Authenticated,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let Path(id) = path?;
  let message = fetch(&state, id).await?;
  policy::authorize_mark_read(&identity, &message)?;

  let message = state
    .store
    .mark_read(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("message {id} not found")))?;
  Ok(Json(MessageResponse { message }))
}
