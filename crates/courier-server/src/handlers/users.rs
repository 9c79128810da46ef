//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Guard |
//! |--------|------|-------|
//! | `GET`  | `/users` | authenticated |
//! | `GET`  | `/users/{username}` | that user only |
//! | `GET`  | `/users/{username}/to` | that user only |
//! | `GET`  | `/users/{username}/from` | that user only |

use axum::{
  Json,
  extract::{Path, State},
};
use courier_core::{
  message::{ReceivedMessage, SentMessage},
  store::CourierStore,
  user::{User, UserSummary},
};
use serde::Serialize;

use crate::{
  AppState,
  auth::{Authenticated, Guard, RequestContext, gate::check_all},
  error::ApiError,
};

#[derive(Debug, Serialize)]
pub struct UserList {
  pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
  pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageList<M> {
  pub messages: Vec<M>,
}

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authenticated(_): Authenticated,
) -> Result<Json<UserList>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  let users = state.store.all_users().await.map_err(ApiError::store)?;
  Ok(Json(UserList { users }))
}

/// `GET /users/{username}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Path(username): Path<String>,
) -> Result<Json<UserDetail>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  check_all(&ctx, &[Guard::Authenticated, Guard::SubjectMatch(&username)])?;

  let user = state
    .store
    .get_user(&username)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {username} not found")))?;
  Ok(Json(UserDetail { user }))
}

/// `GET /users/{username}/to` — messages received by the user.
pub async fn messages_to<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Path(username): Path<String>,
) -> Result<Json<MessageList<ReceivedMessage>>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  check_all(&ctx, &[Guard::Authenticated, Guard::SubjectMatch(&username)])?;

  let messages = state.store.messages_to(&username).await.map_err(ApiError::store)?;
  Ok(Json(MessageList { messages }))
}

/// `GET /users/{username}/from` — messages sent by the user.
pub async fn messages_from<S>(
  State(state): State<AppState<S>>,
  ctx: RequestContext,
  Path(username): Path<String>,
) -> Result<Json<MessageList<SentMessage>>, ApiError>
where
  S: CourierStore + Clone + Send + Sync + 'static,
{
  check_all(&ctx, &[Guard::Authenticated, Guard::SubjectMatch(&username)])?;

  let messages = state.store.messages_from(&username).await.map_err(ApiError::store)?;
  Ok(Json(MessageList { messages }))
}
