//! Sesame Application - Auth orchestration core
//!
//! This crate holds the reproducible core of the Sesame client:
//!
//! - The port traits that external systems (identity provider, HTTP
//!   transport, browser-like host surfaces) are plugged into.
//! - [`AuthSession`]: the provider client wrapper managing the login,
//!   token-probe, and logout flows.
//! - [`ApiGateway`]: the authenticated request gateway.

pub mod auth;
pub mod error;
pub mod gateway;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthSession, Navigation, TokenOutcome};
pub use error::{AuthError, AuthResult};
pub use gateway::ApiGateway;
