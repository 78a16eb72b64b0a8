//! Publish subsystem.
//!
//! # Data Flow
//! ```text
//! publish(id)
//!     → pipeline.rs (load site, fetch canonical render over HTTP)
//!     → kv.rs (PUT snapshot under the subdomain key)
//!     → store (mark published, deployment URL, timestamp)
//!     → rebuild.rs (optional, detached)
//! ```

pub mod kv;
pub mod pipeline;
pub mod rebuild;

pub use pipeline::{PublishMode, PublishOutcome, Publisher, RENDER_TOKEN_HEADER};
