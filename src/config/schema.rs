//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration for the wedding-site service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Hostname routing settings.
    pub domain: DomainConfig,

    /// Application URLs used when publishing.
    pub app: AppConfig,

    /// Edge key-value cache credentials.
    pub cache: CacheConfig,

    /// Hosting-provider rebuild trigger.
    pub rebuild: RebuildConfig,

    /// Site storage settings.
    pub storage: StorageConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl SiteConfig {
    /// Base URL of this service: explicit URL, else platform URL, else local default.
    pub fn base_url(&self) -> String {
        let explicit = non_empty(self.app.base_url.as_deref())
            .map(|url| url.trim_end_matches('/').to_string());
        let platform = || {
            non_empty(self.app.platform_url.as_deref())
                .map(|host| format!("https://{}", host.trim_end_matches('/')))
        };
        explicit
            .or_else(platform)
            .unwrap_or_else(|| format!("http://localhost:{}", self.listener.port().unwrap_or(8080)))
    }

    /// Base URL rendered pages submit RSVPs to.
    pub fn api_url(&self) -> String {
        non_empty(self.app.api_url.as_deref())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.base_url())
    }

    /// Canonical render URL for a tenant subdomain.
    pub fn render_url(&self, subdomain: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url(),
            self.domain.tenant_route_prefix,
            subdomain
        )
    }

    /// Public URL a tenant site is served from.
    pub fn public_site_url(&self, subdomain: &str) -> String {
        format!("https://{}.{}", subdomain, self.domain.primary_domain)
    }
}

/// Treats empty strings the same as absent values.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Port component of the bind address, if it parses.
    pub fn port(&self) -> Option<u16> {
        self.bind_address
            .parse::<SocketAddr>()
            .ok()
            .map(|addr| addr.port())
    }
}

/// Hostname classification and rewrite settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Primary (apex) domain, port included when not on 80/443
    /// (e.g., "example.com" or "localhost:8080").
    pub primary_domain: String,

    /// Local-development suffix; `<label>.<suffix>` is always a tenant host.
    pub local_dev_suffix: String,

    /// First path segment of the canonical render route.
    pub tenant_route_prefix: String,

    /// Path prefixes that are never rewritten (leading `/` omitted).
    pub reserved_path_prefixes: Vec<String>,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            primary_domain: "localhost:8080".to_string(),
            local_dev_suffix: "localhost".to_string(),
            tenant_route_prefix: "wedding".to_string(),
            reserved_path_prefixes: vec![
                "api".to_string(),
                "_next/static".to_string(),
                "_next/image".to_string(),
                "images".to_string(),
                "favicon.ico".to_string(),
                "assets".to_string(),
                "health".to_string(),
            ],
        }
    }
}

/// Application URL configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Explicit base URL of this service (e.g., "https://app.example.com").
    pub base_url: Option<String>,

    /// Platform-assigned hostname, used as `https://<platform_url>`.
    pub platform_url: Option<String>,

    /// Base URL rendered pages post RSVPs to. Defaults to the base URL.
    pub api_url: Option<String>,

    /// Shared token letting the publish pipeline render unpublished sites.
    pub render_token: Option<String>,
}

/// Edge key-value cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Provider API base (without trailing slash).
    pub api_base: String,

    /// Provider account id.
    pub account_id: Option<String>,

    /// KV namespace id.
    pub namespace_id: Option<String>,

    /// API bearer token.
    pub api_token: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.cloudflare.com/client/v4".to_string(),
            account_id: None,
            namespace_id: None,
            api_token: None,
        }
    }
}

/// Complete set of cache credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvCredentials {
    pub account_id: String,
    pub namespace_id: String,
    pub api_token: String,
}

impl CacheConfig {
    /// Returns credentials only when all three values are present and non-empty.
    pub fn credentials(&self) -> Option<KvCredentials> {
        Some(KvCredentials {
            account_id: non_empty(self.account_id.as_deref())?.to_string(),
            namespace_id: non_empty(self.namespace_id.as_deref())?.to_string(),
            api_token: non_empty(self.api_token.as_deref())?.to_string(),
        })
    }

    /// Account id and token, the subset the rebuild trigger needs.
    pub fn account_auth(&self) -> Option<(String, String)> {
        Some((
            non_empty(self.account_id.as_deref())?.to_string(),
            non_empty(self.api_token.as_deref())?.to_string(),
        ))
    }
}

/// Full-site rebuild trigger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RebuildConfig {
    /// Trigger a rebuild after every successful publish.
    pub auto_rebuild: bool,

    /// Hosting project name.
    pub project_name: String,

    /// Source branch to build from.
    pub branch: String,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            auto_rebuild: false,
            project_name: "website-from-generator".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// Site storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot file loaded at startup and written at shutdown.
    pub data_path: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Render fetch timeout in seconds.
    pub render_fetch_secs: u64,

    /// Cache upload timeout in seconds.
    pub cache_upload_secs: u64,

    /// Rebuild trigger timeout in seconds.
    pub rebuild_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
            render_fetch_secs: 15,
            cache_upload_secs: 30,
            rebuild_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_resolution_order() {
        let mut config = SiteConfig::default();
        config.listener.bind_address = "127.0.0.1:3000".to_string();
        assert_eq!(config.base_url(), "http://localhost:3000");

        config.app.platform_url = Some("wedsite.vercel.app".to_string());
        assert_eq!(config.base_url(), "https://wedsite.vercel.app");

        config.app.base_url = Some("https://app.example.com/".to_string());
        assert_eq!(config.base_url(), "https://app.example.com");
        assert_eq!(
            config.render_url("john-mary"),
            "https://app.example.com/wedding/john-mary"
        );
    }

    #[test]
    fn test_empty_values_are_absent() {
        let mut config = SiteConfig::default();
        config.app.base_url = Some("  ".to_string());
        config.listener.bind_address = "0.0.0.0:8080".to_string();
        assert_eq!(config.base_url(), "http://localhost:8080");

        config.cache.account_id = Some("acct".to_string());
        config.cache.namespace_id = Some("ns".to_string());
        config.cache.api_token = Some(String::new());
        assert!(config.cache.credentials().is_none());

        config.cache.api_token = Some("token".to_string());
        let creds = config.cache.credentials().unwrap();
        assert_eq!(creds.namespace_id, "ns");
    }

    #[test]
    fn test_public_site_url() {
        let mut config = SiteConfig::default();
        config.domain.primary_domain = "example.com".to_string();
        assert_eq!(
            config.public_site_url("john-mary"),
            "https://john-mary.example.com"
        );
    }
}
