//! API error type and axum `IntoResponse` implementation.
//!
//! Every failure a handler can produce ends up here and is mapped to a
//! stable status: unauthorized → 401, bad request → 400, not found → 404,
//! oversized body → 413, anything from the store's internals → 500.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use courier_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing identity, or one that fails a guard or ownership rule. The
  /// reason is an optional diagnostic.
  #[error("unauthorized")]
  Unauthorized(Option<&'static str>),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("payload too large")]
  PayloadTooLarge,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store error, keeping the domain failure it wraps distinguishable.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.as_core() {
      Some(core) => Self::from_core(core),
      None => ApiError::Store(Box::new(e)),
    }
  }

  fn from_core(e: &courier_core::Error) -> Self {
    use courier_core::Error as Core;
    match e {
      Core::Unauthorized(reason) => ApiError::Unauthorized(*reason),
      Core::UserNotFound(name) => ApiError::NotFound(format!("user {name} not found")),
      Core::UsernameTaken(name) => {
        ApiError::BadRequest(format!("username {name} is already taken"))
      }
      Core::InvalidRegistration(why) => ApiError::BadRequest((*why).to_owned()),
    }
  }
}

impl From<courier_core::Error> for ApiError {
  fn from(e: courier_core::Error) -> Self { Self::from_core(&e) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
      return ApiError::PayloadTooLarge;
    }
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized(reason) => {
        (StatusCode::UNAUTHORIZED, reason.unwrap_or("Unauthorized").to_owned())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::PayloadTooLarge => {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_owned())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
