//! Identity resolver middleware.
//!
//! Looks for a `_token` in the query string, then in a JSON body, verifies
//! it, and attaches a [`RequestContext`] to the request. It never rejects
//! over a token: a missing or bad one just means an anonymous request, and
//! the guards downstream decide what anonymous callers may do. The only
//! responses it produces itself are for bodies that no handler could read
//! either.

use std::sync::Arc;

use axum::{
  body::{Body, HttpBody as _},
  extract::{Query, Request, State},
  http::{HeaderMap, Uri, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use http_body_util::{BodyExt as _, LengthLimitError, Limited};
use serde::Deserialize;

use crate::{
  auth::{RequestContext, TokenCodec},
  error::ApiError,
};

/// Name of the query parameter and body field carrying the token.
pub const TOKEN_FIELD: &str = "_token";

/// Largest body the resolver will buffer while looking for a token. Kept
/// equal to axum's [`DefaultBodyLimit`](axum::extract::DefaultBodyLimit), so anything the handlers would
/// accept is also searched.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Deserialize)]
struct TokenCarrier {
  #[serde(rename = "_token")]
  token: Option<String>,
}

impl TokenCarrier {
  /// Empty strings count as absent.
  fn into_token(self) -> Option<String> {
    self.token.filter(|t| !t.is_empty())
  }
}

/// What the query string says about the token.
#[derive(Debug, PartialEq, Eq)]
enum QueryToken {
  /// No `_token`, or an empty one; the body may still carry it.
  Absent,
  Present(String),
  /// `_token` given more than once. The query claimed the token slot, so
  /// the body is not consulted, but there is no single value to verify.
  Repeated,
}

/// `from_fn_with_state` middleware; install once, in front of every route.
pub async fn resolve_identity(
  State(tokens): State<Arc<TokenCodec>>,
  req: Request,
  next: Next,
) -> Response {
  if req.extensions().get::<RequestContext>().is_some() {
    return next.run(req).await;
  }

  let (token, mut req) = match extract_token(req).await {
    Ok(found) => found,
    Err(e) => return e.into_response(),
  };
  let identity = token.as_deref().and_then(|t| tokens.verify(t));

  match (&token, &identity) {
    (Some(_), None) => tracing::debug!("ignoring invalid token"),
    (_, Some(identity)) => tracing::debug!(username = %identity, "request authenticated"),
    (None, None) => {}
  }

  req.extensions_mut().insert(RequestContext::new(identity));
  next.run(req).await
}

/// Query string first; the body is only consulted when the query has no
/// token at all. An invalid or repeated query token does not fall through
/// to the body.
async fn extract_token(req: Request) -> Result<(Option<String>, Request), ApiError> {
  match token_from_query(req.uri()) {
    QueryToken::Present(token) => Ok((Some(token), req)),
    QueryToken::Repeated => {
      tracing::debug!("ignoring repeated {TOKEN_FIELD} query parameter");
      Ok((None, req))
    }
    QueryToken::Absent => token_from_body(req).await,
  }
}

fn token_from_query(uri: &Uri) -> QueryToken {
  let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(uri) else {
    return QueryToken::Absent;
  };

  let mut values = pairs.into_iter().filter(|(k, _)| k == TOKEN_FIELD).map(|(_, v)| v);
  match (values.next(), values.next()) {
    (Some(_), Some(_)) => QueryToken::Repeated,
    (Some(token), None) if !token.is_empty() => QueryToken::Present(token),
    _ => QueryToken::Absent,
  }
}

/// Buffer a JSON body, pick `_token` out of it, and hand back a request
/// whose body still holds the same bytes.
///
/// A body that declares more than [`MAX_BODY_BYTES`] is passed on unread so
/// the handler's own limit answers it. One without a declared length that
/// turns out too long has already been consumed, so it is answered here
/// with the same 413.
async fn token_from_body(req: Request) -> Result<(Option<String>, Request), ApiError> {
  if !is_json(req.headers()) {
    return Ok((None, req));
  }
  if req.body().size_hint().lower() > MAX_BODY_BYTES as u64 {
    tracing::debug!("body over the buffering limit; not searched for a token");
    return Ok((None, req));
  }

  let (parts, body) = req.into_parts();
  let bytes = match Limited::new(body, MAX_BODY_BYTES).collect().await {
    Ok(collected) => collected.to_bytes(),
    Err(e) if e.is::<LengthLimitError>() => return Err(ApiError::PayloadTooLarge),
    Err(e) => {
      tracing::debug!(error = %e, "could not buffer body while looking for a token");
      return Err(ApiError::BadRequest("failed to read request body".into()));
    }
  };

  let token = serde_json::from_slice::<TokenCarrier>(&bytes)
    .ok()
    .and_then(TokenCarrier::into_token);
  Ok((token, Request::from_parts(parts, Body::from(bytes))))
}

fn is_json(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("application/json"))
}
