//! Tenant site subsystem.
//!
//! # Data Flow
//! ```text
//! API input (JSON)
//!     → types.rs (parse & validate: Subdomain, TemplateId, dates, colors)
//!     → store.rs (claim subdomain, persist record)
//!     → read by the renderer (by subdomain) and the publisher (by id)
//! ```
//!
//! # Design Decisions
//! - Subdomain uniqueness is enforced by an atomic entry claim
//! - Records are cloned out; callers never hold map guards across awaits
//! - The store is constructed explicitly and injected, never global

pub mod store;
pub mod types;

pub use store::SiteStore;
pub use types::{
    CreateWebsiteInput, NewRsvp, NewWebsite, Photo, PublishRecord, Rsvp, RsvpSubmission,
    Sections, Subdomain, UpdateWebsiteInput, Website, WebsiteContent,
};
