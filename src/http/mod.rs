//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hostname rewrite, then Axum routing and middleware)
//!     → request.rs (request ID, JSON extraction)
//!     → handlers: wedding.rs, sites.rs, deploy.rs, rsvp.rs, catalog.rs
//!     → response.rs (JSON envelope, error mapping)
//!     → Send to client
//! ```

pub mod catalog;
pub mod deploy;
pub mod middleware;
pub mod request;
pub mod response;
pub mod rsvp;
pub mod server;
pub mod sites;
pub mod wedding;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::ApiResponse;
pub use server::{AppState, HttpServer, ServerError};
