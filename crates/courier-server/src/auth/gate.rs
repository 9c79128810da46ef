//! Guards that reject a request before business logic runs.
//!
//! Guards are independent of one another and free of side effects; each
//! only inspects the [`RequestContext`]. Compose them with [`check_all`],
//! which stops at the first failure.

use axum::{extract::FromRequestParts, http::request::Parts};
use courier_core::Identity;

use crate::{auth::RequestContext, error::ApiError};

/// A named predicate over the request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
  /// Some identity is present.
  Authenticated,
  /// The identity is exactly this username (usually taken from the path).
  SubjectMatch(&'a str),
}

impl Guard<'_> {
  pub fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
    match self {
      Guard::Authenticated => require_authenticated(ctx).map(|_| ()),
      Guard::SubjectMatch(expected) => {
        require_subject_match(ctx, expected).map(|_| ())
      }
    }
  }
}

/// Fails with `Unauthorized` when no identity is present.
pub fn require_authenticated(ctx: &RequestContext) -> Result<&Identity, ApiError> {
  ctx.identity().ok_or(ApiError::Unauthorized(None))
}

/// Fails with `Unauthorized` when no identity is present or it names a
/// different user than `expected`.
pub fn require_subject_match<'c>(
  ctx:      &'c RequestContext,
  expected: &str,
) -> Result<&'c Identity, ApiError> {
  match ctx.identity() {
    Some(identity) if identity.is(expected) => Ok(identity),
    _ => Err(ApiError::Unauthorized(None)),
  }
}

/// Run `guards` in order, stopping at the first rejection.
pub fn check_all(ctx: &RequestContext, guards: &[Guard<'_>]) -> Result<(), ApiError> {
  guards.iter().try_for_each(|guard| guard.check(ctx))
}

/// Extractor form of [`require_authenticated`]: present in the handler
/// means the request carried a valid token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl<S> FromRequestParts<S> for Authenticated
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let Ok(ctx) = RequestContext::from_request_parts(parts, state).await;
    require_authenticated(&ctx).cloned().map(Authenticated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn anonymous() -> RequestContext { RequestContext::new(None) }

  fn as_user(name: &str) -> RequestContext {
    RequestContext::new(Some(Identity::new(name)))
  }

  #[test]
  fn authenticated_rejects_only_when_identity_absent() {
    assert!(matches!(
      Guard::Authenticated.check(&anonymous()),
      Err(ApiError::Unauthorized(_))
    ));
    assert!(Guard::Authenticated.check(&as_user("alice")).is_ok());
  }

  #[test]
  fn subject_match_requires_same_username() {
    let ctx = as_user("alice");
    assert!(Guard::SubjectMatch("alice").check(&ctx).is_ok());
    assert!(Guard::SubjectMatch("bob").check(&ctx).is_err());
    assert!(Guard::SubjectMatch("ALICE").check(&ctx).is_err());
  }

  #[test]
  fn subject_match_rejects_anonymous() {
    assert!(Guard::SubjectMatch("alice").check(&anonymous()).is_err());
  }

  #[test]
  fn guards_are_order_independent() {
    let ctx = as_user("alice");
    let forward = [Guard::Authenticated, Guard::SubjectMatch("alice")];
    let reverse = [Guard::SubjectMatch("alice"), Guard::Authenticated];
    assert!(check_all(&ctx, &forward).is_ok());
    assert!(check_all(&ctx, &reverse).is_ok());
  }

  #[test]
  fn check_all_stops_at_first_failure() {
    let ctx = as_user("alice");
    let guards = [Guard::SubjectMatch("bob"), Guard::Authenticated];
    assert!(matches!(check_all(&ctx, &guards), Err(ApiError::Unauthorized(None))));
    assert!(check_all(&ctx, &[]).is_ok());
  }

  #[test]
  fn require_subject_match_returns_identity() {
    let ctx = as_user("alice");
    assert_eq!(require_subject_match(&ctx, "alice").unwrap().username(), "alice");
  }

  #[tokio::test]
  async fn extractor_reads_context_from_extensions() {
    let mut req = axum::http::Request::builder().body(()).unwrap();
    req.extensions_mut().insert(as_user("bob"));
    let (mut parts, _) = req.into_parts();
    let Authenticated(identity) = Authenticated::from_request_parts(&mut parts, &())
      .await
      .unwrap();
    assert_eq!(identity.username(), "bob");
  }

  #[tokio::test]
  async fn extractor_without_context_is_unauthorized() {
    let req = axum::http::Request::builder().body(()).unwrap();
    let (mut parts, _) = req.into_parts();
    assert!(matches!(
      Authenticated::from_request_parts(&mut parts, &()).await,
      Err(ApiError::Unauthorized(None))
    ));
  }
}
