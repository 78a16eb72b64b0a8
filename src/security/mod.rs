//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size, total request time)
//!     → handlers
//!     → headers.rs (security response headers)
//! ```
//!
//! # Design Decisions
//! - No trust in client input; every body is validated by its handler
//! - Permissive CORS is scoped to the RSVP route only

pub mod headers;
pub mod limits;
