//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check URL-shaped settings before they reach the publish pipeline
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{non_empty, SiteConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.domain.primary_domain.trim().is_empty() {
        errors.push(ValidationError::new("domain.primary_domain", "must not be empty"));
    }

    if config.domain.local_dev_suffix.trim().is_empty() {
        errors.push(ValidationError::new("domain.local_dev_suffix", "must not be empty"));
    }

    let prefix = &config.domain.tenant_route_prefix;
    let prefix_ok = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !prefix_ok {
        errors.push(ValidationError::new(
            "domain.tenant_route_prefix",
            "must be a single lowercase path segment",
        ));
    }

    if config
        .domain
        .reserved_path_prefixes
        .iter()
        .any(|p| p.trim_matches('/').is_empty())
    {
        errors.push(ValidationError::new(
            "domain.reserved_path_prefixes",
            "entries must not be empty",
        ));
    }

    check_url(&mut errors, "app.base_url", non_empty(config.app.base_url.as_deref()));
    check_url(&mut errors, "app.api_url", non_empty(config.app.api_url.as_deref()));
    check_url(&mut errors, "cache.api_base", Some(config.cache.api_base.as_str()));

    let timeouts = [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.render_fetch_secs", config.timeouts.render_fetch_secs),
        ("timeouts.cache_upload_secs", config.timeouts.cache_upload_secs),
        ("timeouts.rebuild_secs", config.timeouts.rebuild_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new(
            "security.max_body_size",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address when metrics are enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: Option<&str>) {
    if let Some(raw) = value {
        match url::Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => errors.push(ValidationError::new(
                field,
                format!("unsupported scheme '{}'", parsed.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SiteConfig::default();
        config.listener.bind_address = "nope".to_string();
        config.domain.tenant_route_prefix = "Wed/ding".to_string();
        config.app.base_url = Some("ftp://files.example.com".to_string());
        config.timeouts.render_fetch_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "domain.tenant_route_prefix",
                "app.base_url",
                "timeouts.render_fetch_secs",
            ]
        );
    }
}
