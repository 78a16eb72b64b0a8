//! Template registry and page rendering.
//!
//! # Data Flow
//! ```text
//! Website (+ RSVPs)
//!     → registry.rs (TemplateId → descriptor: palette, fonts, stylesheet)
//!     → view.rs (flatten into the section context)
//!     → engine.rs (minijinja layout + section partials)
//!     → HTML document
//! ```

pub mod engine;
pub mod registry;
pub mod view;

pub use engine::{PageRenderer, RenderError};
pub use registry::{catalog, TemplateDescriptor, TemplateId, UnknownTemplate};
