//! Authentication and authorization for the HTTP surface.
//!
//! Every request passes through [`resolver::resolve_identity`], which works
//! out *who* is calling and records it in a [`RequestContext`] without ever
//! rejecting. Handlers then decide *whether* the caller is allowed, using
//! the guards in [`gate`] and the message rules in
//! [`courier_core::policy`].

pub mod gate;
pub mod resolver;
pub mod token;

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use courier_core::Identity;

pub use gate::{Authenticated, Guard};
pub use token::TokenCodec;

/// Per-request slot holding the caller's identity, if one was verified.
///
/// Set once by the resolver and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
  identity: Option<Identity>,
}

impl RequestContext {
  pub fn new(identity: Option<Identity>) -> Self { Self { identity } }

  pub fn identity(&self) -> Option<&Identity> { self.identity.as_ref() }
}

/// Reads the context the resolver attached. A request that never passed
/// through the resolver is treated as anonymous.
impl<S> FromRequestParts<S> for RequestContext
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts:  &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Ok(parts.extensions.get::<RequestContext>().cloned().unwrap_or_default())
  }
}
