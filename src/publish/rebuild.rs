//! Hosting-provider rebuild trigger.
//!
//! The rebuild runs detached from the publish that requested it. Its outcome
//! is only logged; the returned handle exists so callers can await it in
//! tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;

use crate::config::SiteConfig;

/// Result of one rebuild attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum RebuildOutcome {
    Triggered,
    SkippedNoCredentials,
    Failed(String),
}

pub fn deployments_url(config: &SiteConfig, account_id: &str) -> String {
    format!(
        "{}/accounts/{}/pages/projects/{}/deployments",
        config.cache.api_base.trim_end_matches('/'),
        account_id,
        config.rebuild.project_name
    )
}

/// Ask the provider to rebuild the platform project.
pub async fn trigger_rebuild(http: &reqwest::Client, config: &SiteConfig) -> RebuildOutcome {
    let Some((account_id, api_token)) = config.cache.account_auth() else {
        tracing::warn!("Cloudflare credentials not configured, skipping rebuild trigger");
        return RebuildOutcome::SkippedNoCredentials;
    };

    let url = deployments_url(config, &account_id);
    let result = http
        .post(&url)
        .bearer_auth(api_token)
        .timeout(Duration::from_secs(config.timeouts.rebuild_secs))
        .json(&json!({ "branch": config.rebuild.branch }))
        .send()
        .await;

    match result {
        Ok(res) if res.status().is_success() => {
            tracing::info!(
                project = %config.rebuild.project_name,
                branch = %config.rebuild.branch,
                "Rebuild triggered"
            );
            RebuildOutcome::Triggered
        }
        Ok(res) => {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status, body = %body, "Rebuild trigger rejected");
            RebuildOutcome::Failed(body)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rebuild trigger failed");
            RebuildOutcome::Failed(e.to_string())
        }
    }
}

/// Spawn [`trigger_rebuild`] on the runtime without awaiting it.
pub fn spawn_rebuild(http: reqwest::Client, config: Arc<SiteConfig>) -> JoinHandle<RebuildOutcome> {
    tokio::spawn(async move { trigger_rebuild(&http, &config).await })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployments_url() {
        let mut config = SiteConfig::default();
        config.cache.api_base = "http://127.0.0.1:9/v4/".to_string();
        assert_eq!(
            deployments_url(&config, "acct"),
            "http://127.0.0.1:9/v4/accounts/acct/pages/projects/website-from-generator/deployments"
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_skip() {
        let config = SiteConfig::default();
        let outcome = trigger_rebuild(&reqwest::Client::new(), &config).await;
        assert_eq!(outcome, RebuildOutcome::SkippedNoCredentials);
    }
}
