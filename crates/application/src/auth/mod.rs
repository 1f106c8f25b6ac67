//! Provider client wrapper: session lifecycle and login/logout flows.

mod session;

pub use session::{AuthSession, Navigation, TokenOutcome};
