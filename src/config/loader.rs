//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file without validating it.
pub fn load_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve the effective configuration: optional file, then environment
/// overrides, then validation.
pub fn resolve_config<I>(path: Option<&Path>, vars: I) -> Result<SiteConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => SiteConfig::default(),
    };
    apply_env_overrides(&mut config, vars);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment-style overrides on top of file configuration.
///
/// Unknown variables are ignored. Empty values clear optional settings.
pub fn apply_env_overrides<I>(config: &mut SiteConfig, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let optional = || {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        match key.as_str() {
            "WEDSITE_BIND_ADDRESS" => config.listener.bind_address = value.trim().to_string(),
            "WEDSITE_MAIN_DOMAIN" => config.domain.primary_domain = value.trim().to_lowercase(),
            "WEDSITE_LOCAL_SUFFIX" => config.domain.local_dev_suffix = value.trim().to_lowercase(),
            "WEDSITE_APP_URL" => config.app.base_url = optional(),
            "WEDSITE_PLATFORM_URL" => config.app.platform_url = optional(),
            "WEDSITE_API_URL" => config.app.api_url = optional(),
            "WEDSITE_RENDER_TOKEN" => config.app.render_token = optional(),
            "WEDSITE_DATA_PATH" => config.storage.data_path = optional(),
            "CLOUDFLARE_ACCOUNT_ID" => config.cache.account_id = optional(),
            "CLOUDFLARE_KV_NAMESPACE_ID" => config.cache.namespace_id = optional(),
            "CLOUDFLARE_API_TOKEN" => config.cache.api_token = optional(),
            "CLOUDFLARE_PAGES_PROJECT_NAME" => {
                if let Some(name) = optional() {
                    config.rebuild.project_name = name;
                }
            }
            "WEDSITE_AUTO_REBUILD" => config.rebuild.auto_rebuild = parse_flag(&value),
            _ => continue,
        }
        tracing::debug!(variable = %key, "Applied environment override");
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        apply_env_overrides(
            &mut config,
            vars(&[
                ("WEDSITE_MAIN_DOMAIN", "Example.com"),
                ("CLOUDFLARE_ACCOUNT_ID", "acct"),
                ("CLOUDFLARE_KV_NAMESPACE_ID", "ns"),
                ("CLOUDFLARE_API_TOKEN", "secret"),
                ("WEDSITE_AUTO_REBUILD", "TRUE"),
                ("PATH", "/usr/bin"),
            ]),
        );

        assert_eq!(config.domain.primary_domain, "example.com");
        assert!(config.cache.credentials().is_some());
        assert!(config.rebuild.auto_rebuild);
    }

    #[test]
    fn test_empty_project_name_keeps_default() {
        let mut config = SiteConfig::default();
        apply_env_overrides(&mut config, vars(&[("CLOUDFLARE_PAGES_PROJECT_NAME", "")]));
        assert_eq!(config.rebuild.project_name, "website-from-generator");
    }

    #[test]
    fn test_toml_parsing_with_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [domain]
            primary_domain = "example.com"

            [cache]
            account_id = "acct"
            "#,
        )
        .unwrap();

        assert_eq!(config.domain.primary_domain, "example.com");
        assert_eq!(config.domain.tenant_route_prefix, "wedding");
        assert_eq!(config.cache.account_id.as_deref(), Some("acct"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_resolve_rejects_invalid() {
        let result = resolve_config(None, vars(&[("WEDSITE_BIND_ADDRESS", "not-an-address")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
