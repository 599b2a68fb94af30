//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! The stack itself is assembled in `routes::app`.

pub mod session;

pub use session::{SESSION_COOKIE_NAME, create_session_layer};
