//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by a host embedding the client.

mod browser;
mod cookies;
mod provider;
mod storage;
mod transport;

use std::future::Future;
use std::pin::Pin;

pub use browser::Navigator;
pub use cookies::CookieSource;
pub use provider::{IdentityProvider, ProviderError};
pub use storage::ClientStorage;
pub use transport::{HttpTransport, TransportError};

/// Boxed future type used by the async port methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
