//! Session module
//!
//! One `SessionContext` is one logical browser session: configuration,
//! cookie jar, login flag, and the rate-limiter timestamp. The transport
//! submodule is the only way requests leave a session.

mod context;
mod state;
pub mod transport;

// Re-export main types
pub use context::{build_http_client, SessionContext};
pub use state::SessionState;
pub use transport::{RequestOptions, StreamResponse};
