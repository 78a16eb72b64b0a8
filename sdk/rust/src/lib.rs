//! Typed async client for the wedsite HTTP API.

pub mod client;
pub mod types;

pub use client::{SdkError, WeddingClient};
pub use types::*;
