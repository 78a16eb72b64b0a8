//! Error types shared by the store, renderer and publish pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field problem found while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-field failure.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown website id, unknown or unpublished subdomain.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed site, content or RSVP input.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Subdomain already claimed by another site.
    #[error("Subdomain already taken: {subdomain}")]
    Conflict { subdomain: String },

    /// The cache provider rejected the snapshot upload.
    #[error("Cache deployment failed: {0}")]
    DeploymentFailed(String),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Snapshot persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn website_not_found(id: impl ToString) -> Self {
        AppError::NotFound {
            entity: "Website",
            id: id.to_string(),
        }
    }

    pub fn subdomain_not_found(subdomain: impl ToString) -> Self {
        AppError::NotFound {
            entity: "Subdomain",
            id: subdomain.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
