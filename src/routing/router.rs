//! Hostname classification and tenant path rewriting.
//!
//! # Responsibilities
//! - Classify a `Host` as primary, `www`, tenant or pass-through
//! - Rewrite tenant requests to `/<prefix>/<subdomain><path>?<query>`
//! - Leave reserved path prefixes untouched on every host
//!
//! # Design Decisions
//! - Pure function of host, path and static config
//! - Immutable after construction (thread-safe without locks)
//! - Rules are evaluated in a fixed order and the first match wins

use std::net::IpAddr;

use axum::http::uri::{PathAndQuery, Uri};
use axum::http::{header, Request};

use crate::config::DomainConfig;
use crate::observability::metrics;

use super::matcher::{
    AnyMatcher, HostMatcher, HostSuffixMatcher, LabelMatcher, Matcher, PathPrefixMatcher,
    RequestTarget,
};

/// How a host is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The platform itself.
    Primary,
    /// `www.` of any domain.
    Www,
    /// A tenant site; the value is the leftmost host label.
    Tenant(String),
    /// Anything else (IP literals, bare hostnames), served unchanged.
    Passthrough,
}

/// Request extension recording the tenant a request was rewritten for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSubdomain(pub String);

#[derive(Debug)]
pub struct HostnameRouter {
    reserved: AnyMatcher,
    primary: HostMatcher,
    www: LabelMatcher,
    local_dev: HostSuffixMatcher,
    route_prefix: String,
}

impl HostnameRouter {
    pub fn from_config(config: &DomainConfig) -> Self {
        let reserved = config
            .reserved_path_prefixes
            .iter()
            .filter(|p| !p.trim_start_matches('/').is_empty())
            .map(|p| Box::new(PathPrefixMatcher::new(p.as_str())) as Box<dyn Matcher>)
            .collect();

        Self {
            reserved: AnyMatcher::new(reserved),
            primary: HostMatcher::new(config.primary_domain.as_str()),
            www: LabelMatcher::new("www"),
            local_dev: HostSuffixMatcher::new(&config.local_dev_suffix),
            route_prefix: config.tenant_route_prefix.trim_matches('/').to_string(),
        }
    }

    /// True when `path` must never be rewritten.
    pub fn is_reserved(&self, path: &str) -> bool {
        self.reserved.matches(&RequestTarget::new("", path))
    }

    pub fn classify(&self, host: &str) -> HostClass {
        let host = host.trim().to_lowercase();
        if host.is_empty() {
            return HostClass::Passthrough;
        }
        let target = RequestTarget::new(&host, "/");

        if self.primary.matches(&target) {
            return HostClass::Primary;
        }
        if self.www.matches(&target) {
            return HostClass::Www;
        }

        let label = target.leftmost_label();
        if label.is_empty() {
            return HostClass::Passthrough;
        }
        if self.local_dev.matches(&target) {
            return HostClass::Tenant(label.to_string());
        }
        if is_ip_literal(&host) || !host_without_port(&host).contains('.') {
            return HostClass::Passthrough;
        }
        HostClass::Tenant(label.to_string())
    }

    /// The rewritten path-and-query for a tenant request, or `None` when the
    /// request passes through unchanged.
    pub fn rewrite_target(&self, host: &str, path_and_query: &str) -> Option<String> {
        self.tenant_rewrite(host, path_and_query)
            .map(|(_, rewritten)| rewritten)
    }

    fn tenant_rewrite(&self, host: &str, path_and_query: &str) -> Option<(String, String)> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        if self.is_reserved(path) {
            return None;
        }

        let HostClass::Tenant(subdomain) = self.classify(host) else {
            return None;
        };
        let mut rewritten = format!("/{}/{}{}", self.route_prefix, subdomain, path);
        if let Some(query) = query {
            rewritten.push('?');
            rewritten.push_str(query);
        }
        Some((subdomain, rewritten))
    }

    /// Apply [`rewrite_target`](Self::rewrite_target) to a request before it
    /// reaches the HTTP router.
    pub fn rewrite_request<B>(&self, mut req: Request<B>) -> Request<B> {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()));
        let Some(host) = host else {
            return req;
        };

        let original = req
            .uri()
            .path_and_query()
            .map(PathAndQuery::as_str)
            .unwrap_or("/")
            .to_string();
        let Some((subdomain, rewritten)) = self.tenant_rewrite(&host, &original) else {
            return req;
        };

        let mut parts = req.uri().clone().into_parts();
        let uri = PathAndQuery::try_from(rewritten.as_str())
            .ok()
            .and_then(|pq| {
                parts.path_and_query = Some(pq);
                Uri::from_parts(parts).ok()
            });
        let Some(uri) = uri else {
            tracing::warn!(host = %host, path = %original, "Tenant rewrite produced an invalid URI");
            return req;
        };

        tracing::debug!(host = %host, from = %original, to = %uri, "Rewrote tenant request");
        metrics::record_tenant_rewrite();

        *req.uri_mut() = uri;
        req.extensions_mut().insert(TenantSubdomain(subdomain));
        req
    }
}

fn host_without_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default();
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn is_ip_literal(host: &str) -> bool {
    host_without_port(host).parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn router(primary: &str) -> HostnameRouter {
        HostnameRouter::from_config(&DomainConfig {
            primary_domain: primary.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_tenant_host_is_rewritten() {
        let r = router("example.com");
        assert_eq!(
            r.rewrite_target("john-mary.example.com", "/"),
            Some("/wedding/john-mary/".to_string())
        );
    }

    #[test]
    fn test_primary_and_www_pass_through() {
        let r = router("example.com");
        assert_eq!(r.classify("example.com"), HostClass::Primary);
        assert_eq!(r.classify("EXAMPLE.com"), HostClass::Primary);
        assert_eq!(r.classify("www.example.com"), HostClass::Www);
        assert_eq!(r.rewrite_target("example.com", "/pricing"), None);
        assert_eq!(r.rewrite_target("www.example.com", "/"), None);
    }

    #[test]
    fn test_reserved_paths_never_rewritten() {
        let r = router("example.com");
        for path in [
            "/api/rsvp",
            "/_next/static/chunk.js",
            "/_next/image?url=x",
            "/images/hero.jpg",
            "/favicon.ico",
            "/assets/app.css",
            "/health",
        ] {
            assert_eq!(r.rewrite_target("john-mary.example.com", path), None, "{}", path);
        }
    }

    #[test]
    fn test_local_dev_suffix() {
        let r = router("localhost:8080");
        assert_eq!(
            r.classify("john-mary.localhost:3000"),
            HostClass::Tenant("john-mary".to_string())
        );
        assert_eq!(r.classify("localhost:8080"), HostClass::Primary);
        assert_eq!(r.classify("localhost:3000"), HostClass::Passthrough);
        assert_eq!(r.classify("www.localhost:3000"), HostClass::Www);
    }

    #[test]
    fn test_query_is_preserved() {
        let r = router("example.com");
        assert_eq!(
            r.rewrite_target("a-b.example.com", "/?utm=x&y=1"),
            Some("/wedding/a-b/?utm=x&y=1".to_string())
        );
        assert_eq!(
            r.rewrite_target("a-b.example.com", "/gallery?page=2"),
            Some("/wedding/a-b/gallery?page=2".to_string())
        );
    }

    #[test]
    fn test_ip_and_bare_hosts_pass_through() {
        let r = router("example.com");
        assert_eq!(r.classify("127.0.0.1:8080"), HostClass::Passthrough);
        assert_eq!(r.classify("[::1]:8080"), HostClass::Passthrough);
        assert_eq!(r.classify("intranet"), HostClass::Passthrough);
        assert_eq!(r.classify(""), HostClass::Passthrough);
    }

    #[test]
    fn test_foreign_domain_is_tenant() {
        let r = router("example.com");
        assert_eq!(
            r.classify("anna-ben.other.org"),
            HostClass::Tenant("anna-ben".to_string())
        );
    }

    #[test]
    fn test_rewrite_request_sets_uri_and_extension() {
        let r = router("example.com");
        let req = Request::builder()
            .uri("/?lang=en")
            .header(header::HOST, "john-mary.example.com")
            .body(Body::empty())
            .unwrap();
        let req = r.rewrite_request(req);
        assert_eq!(req.uri().path(), "/wedding/john-mary/");
        assert_eq!(req.uri().query(), Some("lang=en"));
        assert_eq!(
            req.extensions().get::<TenantSubdomain>(),
            Some(&TenantSubdomain("john-mary".to_string()))
        );
    }

    #[test]
    fn test_rewrite_request_without_host() {
        let r = router("example.com");
        let req = Request::builder().uri("/x").body(Body::empty()).unwrap();
        assert_eq!(r.rewrite_request(req).uri().path(), "/x");
    }
}
