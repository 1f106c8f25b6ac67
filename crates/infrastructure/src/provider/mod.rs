//! Identity provider adapter.

mod oidc_client;
mod session_cache;

pub use oidc_client::OidcProviderClient;
