//! Sesame Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: the HTTP-based identity provider client, the
//! reqwest transport, and in-memory host-surface adapters for embedding
//! and tests.

pub mod adapters;
pub mod provider;

pub use adapters::{
    InMemoryCookieSource, InMemoryNavigator, InMemoryStorage, NavigationEvent, ReqwestTransport,
};
pub use provider::OidcProviderClient;
