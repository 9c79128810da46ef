//! JSON handlers for the Courier HTTP surface.

pub mod auth;
pub mod messages;
pub mod users;
