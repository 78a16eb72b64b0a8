//! Edge key-value cache client.
//!
//! # Responsibilities
//! - Upload rendered snapshots under the subdomain key (last writer wins)
//! - Remove snapshots on unpublish
//! - Surface the provider's error body on rejection

use std::time::Duration;

use thiserror::Error;

use crate::config::KvCredentials;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("KV request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("KV provider returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl KvError {
    /// Provider error text when the request reached the provider.
    pub fn detail(&self) -> String {
        match self {
            KvError::Rejected { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// KV namespace client bound to one account and namespace.
#[derive(Clone)]
pub struct KvClient {
    http: reqwest::Client,
    api_base: String,
    credentials: KvCredentials,
    timeout: Duration,
}

impl KvClient {
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        credentials: KvCredentials,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
            timeout,
        }
    }

    pub fn value_url(&self, key: &str) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/values/{}",
            self.api_base, self.credentials.account_id, self.credentials.namespace_id, key
        )
    }

    /// Overwrite the value stored under `key`.
    pub async fn put(&self, key: &str, html: String) -> Result<(), KvError> {
        let res = self
            .http
            .put(self.value_url(key))
            .bearer_auth(&self.credentials.api_token)
            .header(reqwest::header::CONTENT_TYPE, "text/html")
            .timeout(self.timeout)
            .body(html)
            .send()
            .await?;
        check(res).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), KvError> {
        let res = self
            .http
            .delete(self.value_url(key))
            .bearer_auth(&self.credentials.api_token)
            .timeout(self.timeout)
            .send()
            .await?;
        check(res).await
    }
}

async fn check(res: reqwest::Response) -> Result<(), KvError> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }
    let body = res.text().await.unwrap_or_default();
    Err(KvError::Rejected {
        status: status.as_u16(),
        body,
    })
}
