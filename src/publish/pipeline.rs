//! Publish pipeline.
//!
//! # Responsibilities
//! - Fetch the canonical render of a site over HTTP
//! - Upload the markup to the edge cache under the subdomain key
//! - Record the outcome on the site
//! - Degrade to on-demand rendering when the fetch fails or the cache is
//!   unconfigured; only a rejected upload is an error
//!
//! # Design Decisions
//! - Render fetch and upload run in sequence; the upload needs the markup
//! - A rejected upload leaves the site exactly as it was
//! - The optional rebuild is spawned detached and never affects the result

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::USER_AGENT;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::schema::non_empty;
use crate::config::SiteConfig;
use crate::error::{AppError, AppResult};
use crate::observability::metrics;
use crate::sites::{PublishRecord, SiteStore, Website};

use super::kv::KvClient;
use super::rebuild::{spawn_rebuild, RebuildOutcome};

/// Header carrying the render token on the pipeline's own fetch.
pub const RENDER_TOKEN_HEADER: &str = "x-render-token";
pub const DEPLOY_USER_AGENT: &str = "wedsite-deploy";

/// How a successful publish is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Snapshot uploaded to the edge cache.
    Cached,
    /// No cache credentials; served by on-demand rendering.
    OnDemandCacheUnconfigured,
    /// Render fetch failed; served by on-demand rendering.
    OnDemandRenderFailed,
}

impl PublishMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishMode::Cached => "cached",
            PublishMode::OnDemandCacheUnconfigured => "on_demand_cache_unconfigured",
            PublishMode::OnDemandRenderFailed => "on_demand_render_failed",
        }
    }

    fn message(self) -> &'static str {
        match self {
            PublishMode::Cached => "Website deployed successfully",
            PublishMode::OnDemandCacheUnconfigured => {
                "Website marked as published (cache not configured)"
            }
            PublishMode::OnDemandRenderFailed => {
                "Website marked as published (using on-demand rendering)"
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublishOutcome {
    pub url: String,
    pub message: String,
    pub mode: PublishMode,
    #[serde(skip)]
    pub rebuild: Option<JoinHandle<RebuildOutcome>>,
}

#[derive(Debug, Error)]
enum RenderFetchError {
    #[error("render request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("render returned {0}")]
    Status(reqwest::StatusCode),
}

pub struct Publisher {
    config: Arc<SiteConfig>,
    store: SiteStore,
    http: reqwest::Client,
    kv: Option<KvClient>,
    /// The configured render token, else one generated for this process.
    render_token: String,
}

impl Publisher {
    /// Build a publisher with its own outbound HTTP client.
    pub fn new(config: Arc<SiteConfig>, store: SiteStore) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;
        let kv = config.cache.credentials().map(|credentials| {
            KvClient::new(
                http.clone(),
                &config.cache.api_base,
                credentials,
                Duration::from_secs(config.timeouts.cache_upload_secs),
            )
        });
        let render_token = non_empty(config.app.render_token.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        Ok(Self {
            config,
            store,
            http,
            kv,
            render_token,
        })
    }

    pub fn cache_configured(&self) -> bool {
        self.kv.is_some()
    }

    /// Token the render route accepts for drafts.
    pub fn render_token(&self) -> &str {
        &self.render_token
    }

    /// Publish a site, returning where it is now served from.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `DeploymentFailed` when the cache
    /// rejects the upload.
    pub async fn publish(&self, id: Uuid) -> AppResult<PublishOutcome> {
        let start = Instant::now();
        let website = self.store.get(id)?;
        let subdomain = website.subdomain.as_str();
        let render_url = self.config.render_url(subdomain);
        let public_url = self.config.public_site_url(subdomain);

        let html = match self.fetch_rendered(&render_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    website_id = %id,
                    subdomain,
                    render_url = %render_url,
                    error = %e,
                    "Could not fetch rendered page, falling back to on-demand rendering"
                );
                return self.finish(
                    &website,
                    PublishMode::OnDemandRenderFailed,
                    PublishRecord {
                        deployment_url: render_url,
                        deployment_id: None,
                    },
                    start,
                );
            }
        };

        let Some(kv) = &self.kv else {
            tracing::warn!(
                website_id = %id,
                subdomain,
                "Cache credentials not configured, skipping upload"
            );
            return self.finish(
                &website,
                PublishMode::OnDemandCacheUnconfigured,
                PublishRecord {
                    deployment_url: public_url,
                    deployment_id: None,
                },
                start,
            );
        };

        if let Err(e) = kv.put(subdomain, html).await {
            metrics::record_publish_failure();
            tracing::error!(website_id = %id, subdomain, error = %e, "Cache upload rejected");
            return Err(AppError::DeploymentFailed(e.detail()));
        }

        let outcome = self.finish(
            &website,
            PublishMode::Cached,
            PublishRecord {
                deployment_url: public_url,
                deployment_id: Some(subdomain.to_string()),
            },
            start,
        );
        if let Err(AppError::NotFound { .. }) = &outcome {
            // Deleted while uploading.
            discard_snapshot(kv, &website).await;
        }
        outcome
    }

    fn finish(
        &self,
        website: &Website,
        mode: PublishMode,
        record: PublishRecord,
        start: Instant,
    ) -> AppResult<PublishOutcome> {
        let url = record.deployment_url.clone();
        self.store.mark_published(website.id, record)?;
        metrics::record_publish(mode.as_str(), start);
        tracing::info!(
            website_id = %website.id,
            subdomain = %website.subdomain,
            mode = mode.as_str(),
            url = %url,
            "Website published"
        );

        let rebuild = self
            .config
            .rebuild
            .auto_rebuild
            .then(|| spawn_rebuild(self.http.clone(), self.config.clone()));

        Ok(PublishOutcome {
            url,
            message: mode.message().to_string(),
            mode,
            rebuild,
        })
    }

    /// Take a site offline. The cached snapshot is removed on a best-effort
    /// basis.
    pub async fn unpublish(&self, id: Uuid) -> AppResult<Website> {
        let website = self.store.mark_unpublished(id)?;
        if let Some(kv) = &self.kv {
            discard_snapshot(kv, &website).await;
        }
        tracing::info!(website_id = %id, subdomain = %website.subdomain, "Website unpublished");
        Ok(website)
    }

    async fn fetch_rendered(&self, render_url: &str) -> Result<String, RenderFetchError> {
        let req = self
            .http
            .get(render_url)
            .header(USER_AGENT, DEPLOY_USER_AGENT)
            .header(RENDER_TOKEN_HEADER, &self.render_token)
            .timeout(Duration::from_secs(self.config.timeouts.render_fetch_secs));

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(RenderFetchError::Status(status));
        }
        Ok(res.text().await?)
    }
}

async fn discard_snapshot(kv: &KvClient, website: &Website) {
    if let Err(e) = kv.delete(website.subdomain.as_str()).await {
        tracing::warn!(
            website_id = %website.id,
            subdomain = %website.subdomain,
            error = %e,
            "Could not remove cached snapshot"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::CreateWebsiteInput;

    fn unreachable_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        // Port 9 (discard) is closed on test machines; the fetch fails fast.
        config.app.base_url = Some("http://127.0.0.1:9".to_string());
        config.domain.primary_domain = "example.com".to_string();
        config.timeouts.render_fetch_secs = 2;
        config
    }

    fn seed(store: &SiteStore) -> Uuid {
        let input = CreateWebsiteInput {
            template_id: "classic-elegance".to_string(),
            bride_name: "Mary".to_string(),
            groom_name: "John".to_string(),
            wedding_date: "2030-08-15".to_string(),
            subdomain: None,
        };
        store.create(input.validate().unwrap()).unwrap().id
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(
            serde_json::to_value(PublishMode::OnDemandCacheUnconfigured).unwrap(),
            "on_demand_cache_unconfigured"
        );
        assert_eq!(PublishMode::Cached.as_str(), "cached");
    }

    #[tokio::test]
    async fn test_unknown_site_is_not_found() {
        let publisher = Publisher::new(Arc::new(unreachable_config()), SiteStore::default()).unwrap();
        let err = publisher.publish(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_render_failure_degrades_to_render_route() {
        let store = SiteStore::default();
        let id = seed(&store);
        let publisher = Publisher::new(Arc::new(unreachable_config()), store.clone()).unwrap();

        let outcome = publisher.publish(id).await.unwrap();
        assert_eq!(outcome.mode, PublishMode::OnDemandRenderFailed);
        assert_eq!(outcome.url, "http://127.0.0.1:9/wedding/mary-john");
        assert!(outcome.rebuild.is_none());

        let site = store.get(id).unwrap();
        assert!(site.published);
        assert!(site.published_at.is_some());
        assert_eq!(site.deployment_url.as_deref(), Some("http://127.0.0.1:9/wedding/mary-john"));
    }

    #[tokio::test]
    async fn test_unpublish_clears_state() {
        let store = SiteStore::default();
        let id = seed(&store);
        let publisher = Publisher::new(Arc::new(unreachable_config()), store.clone()).unwrap();
        publisher.publish(id).await.unwrap();

        let site = publisher.unpublish(id).await.unwrap();
        assert!(!site.published);
        assert!(site.deployment_url.is_none());
        assert!(!publisher.cache_configured());
    }

    #[test]
    fn test_render_token_generated_when_unset() {
        let publisher = Publisher::new(Arc::new(unreachable_config()), SiteStore::default()).unwrap();
        assert_eq!(publisher.render_token().len(), 32);

        let mut config = unreachable_config();
        config.app.render_token = Some("shared".to_string());
        let publisher = Publisher::new(Arc::new(config), SiteStore::default()).unwrap();
        assert_eq!(publisher.render_token(), "shared");
    }
}
