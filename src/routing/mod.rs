//! Hostname routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host, path, query)
//!     → router.rs (reserved path? primary? www? tenant?)
//!     → matcher.rs (evaluate host and path conditions)
//!     → tenant: URI rewritten to /<prefix>/<subdomain><path>?<query>
//!     → axum Router (canonical routes only)
//! ```
//!
//! # Design Decisions
//! - The rewrite runs before route matching, as a request map layer
//! - Deterministic: same input always yields the same rewrite
//! - No regex in hot path (prefix matching only)

pub mod matcher;
pub mod router;

pub use router::{HostClass, HostnameRouter, TenantSubdomain};
