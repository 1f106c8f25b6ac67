//! Port adapters.

mod memory;
mod reqwest_transport;

pub use memory::{InMemoryCookieSource, InMemoryNavigator, InMemoryStorage, NavigationEvent};
pub use reqwest_transport::ReqwestTransport;
