//! Multi-tenant wedding-website service library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod publish;
pub mod routing;
pub mod security;
pub mod sites;
pub mod templates;

pub use config::schema::SiteConfig;
pub use error::{AppError, AppResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use sites::SiteStore;
