//! Host and path conditions used by the hostname router.
//!
//! # Design Decisions
//! - Hosts are compared lowercased, with any port kept
//! - Path prefixes are raw string prefixes of the path without its leading `/`
//! - No regex in the request path

/// The parts of a request the router looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestTarget<'a> {
    /// Lowercased `Host`, port included.
    pub host: &'a str,
    pub path: &'a str,
}

impl<'a> RequestTarget<'a> {
    pub fn new(host: &'a str, path: &'a str) -> Self {
        Self { host, path }
    }

    /// First dot-separated label of the host, port stripped.
    pub fn leftmost_label(&self) -> &'a str {
        let label = self.host.split('.').next().unwrap_or_default();
        label.split(':').next().unwrap_or_default()
    }
}

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the target matches this condition.
    fn matches(&self, target: &RequestTarget<'_>) -> bool;
}

/// Matches the whole host exactly.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        target.host == self.expected_host
    }
}

/// Matches the leftmost host label, e.g. `www`.
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    label: String,
}

impl LabelMatcher {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into().to_lowercase(),
        }
    }
}

impl Matcher for LabelMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        target.host.contains('.') && target.leftmost_label() == self.label
    }
}

/// Matches hosts containing `.<suffix>` anywhere, e.g. `john.localhost:3000`.
#[derive(Debug, Clone)]
pub struct HostSuffixMatcher {
    needle: String,
}

impl HostSuffixMatcher {
    pub fn new(suffix: &str) -> Self {
        Self {
            needle: format!(".{}", suffix.to_lowercase()),
        }
    }
}

impl Matcher for HostSuffixMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        target.host.contains(&self.needle)
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// `prefix` is given without a leading `/`, e.g. `_next/static`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_start_matches('/').to_string(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        let path = target.path.strip_prefix('/').unwrap_or(target.path);
        path.starts_with(&self.prefix)
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, target: &RequestTarget<'_>) -> bool {
        self.matchers.iter().any(|m| m.matches(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_matcher() {
        let matcher = HostMatcher::new("Example.com");
        assert!(matcher.matches(&RequestTarget::new("example.com", "/")));
        assert!(!matcher.matches(&RequestTarget::new("example.com:8080", "/")));
        assert!(!matcher.matches(&RequestTarget::new("other.com", "/")));
    }

    #[test]
    fn test_label_matcher() {
        let matcher = LabelMatcher::new("www");
        assert!(matcher.matches(&RequestTarget::new("www.example.com", "/")));
        assert!(matcher.matches(&RequestTarget::new("www.localhost:3000", "/")));
        assert!(!matcher.matches(&RequestTarget::new("www", "/")));
        assert!(!matcher.matches(&RequestTarget::new("wwwx.example.com", "/")));
    }

    #[test]
    fn test_suffix_matcher() {
        let matcher = HostSuffixMatcher::new("localhost");
        assert!(matcher.matches(&RequestTarget::new("john.localhost:3000", "/")));
        assert!(!matcher.matches(&RequestTarget::new("localhost:3000", "/")));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("api");
        assert!(matcher.matches(&RequestTarget::new("h", "/api/v1")));
        // Raw prefix, no segment boundary.
        assert!(matcher.matches(&RequestTarget::new("h", "/apiary")));
        assert!(!matcher.matches(&RequestTarget::new("h", "/images")));
    }

    #[test]
    fn test_any_matcher() {
        let matcher = AnyMatcher::new(vec![
            Box::new(PathPrefixMatcher::new("api")),
            Box::new(PathPrefixMatcher::new("_next/static")),
        ]);
        assert!(matcher.matches(&RequestTarget::new("h", "/_next/static/chunk.js")));
        assert!(!matcher.matches(&RequestTarget::new("h", "/_next/data")));
        assert!(!AnyMatcher::default().matches(&RequestTarget::new("h", "/api")));
    }

    #[test]
    fn test_leftmost_label_strips_port() {
        assert_eq!(RequestTarget::new("john:3000", "/").leftmost_label(), "john");
        assert_eq!(RequestTarget::new("a.b.c", "/").leftmost_label(), "a");
    }
}
