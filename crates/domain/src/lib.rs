//! Sesame Domain - Core auth client types
//!
//! This crate defines the domain model for the Sesame passwordless
//! authentication client. All types here are pure Rust with no I/O
//! dependencies.

pub mod config;
pub mod csrf;
pub mod error;
pub mod request;
pub mod response;
pub mod token;

pub use config::{CacheLocation, DEFAULT_TOKEN_TIMEOUT_MS, GatewayConfig, ProviderConfig};
pub use csrf::AntiForgeryToken;
pub use error::{DomainError, DomainResult};
pub use request::{Header, HttpMethod, OutboundRequest, RequestOptions};
pub use response::HttpResponse;
pub use token::AccessToken;
