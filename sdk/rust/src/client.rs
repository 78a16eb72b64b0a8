use std::fmt;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{
    CreateWebsite, Envelope, FieldError, Photo, PublishResult, Rsvp, RsvpRequest, TemplateInfo,
    Website,
};

#[derive(Debug)]
pub enum SdkError {
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Api {
        status: StatusCode,
        error: Option<String>,
        details: Vec<FieldError>,
    },
}

impl SdkError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Http(e) => e.status(),
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkError::Http(e) => write!(f, "request failed: {}", e),
            SdkError::Api { status, error, .. } => write!(
                f,
                "server returned {}: {}",
                status,
                error.as_deref().unwrap_or("no error message")
            ),
        }
    }
}

impl std::error::Error for SdkError {}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Http(e)
    }
}

pub struct WeddingClient {
    client: Client,
    base_url: String,
}

impl WeddingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_templates(&self) -> Result<Vec<TemplateInfo>, SdkError> {
        let res = self.client.get(self.url("/api/templates")).send().await?;
        parse(res).await
    }

    pub async fn list_websites(&self) -> Result<Vec<Website>, SdkError> {
        let res = self.client.get(self.url("/api/websites")).send().await?;
        parse(res).await
    }

    pub async fn create_website(&self, req: &CreateWebsite) -> Result<Website, SdkError> {
        self.post("/api/websites", req).await
    }

    pub async fn get_website(&self, id: &str) -> Result<Website, SdkError> {
        let res = self
            .client
            .get(self.url(&format!("/api/websites/{}", id)))
            .send()
            .await?;
        parse(res).await
    }

    /// Partial update; `patch` uses the server's camelCase field names.
    pub async fn update_website(&self, id: &str, patch: &Value) -> Result<Website, SdkError> {
        let res = self
            .client
            .patch(self.url(&format!("/api/websites/{}", id)))
            .json(patch)
            .send()
            .await?;
        parse(res).await
    }

    pub async fn delete_website(&self, id: &str) -> Result<Website, SdkError> {
        let res = self
            .client
            .delete(self.url(&format!("/api/websites/{}", id)))
            .send()
            .await?;
        parse(res).await
    }

    pub async fn add_photo(&self, id: &str, photo: &Photo) -> Result<Photo, SdkError> {
        self.post(&format!("/api/websites/{}/photos", id), photo).await
    }

    /// Publish via `POST /api/deploy`.
    pub async fn deploy(&self, id: &str) -> Result<PublishResult, SdkError> {
        self.post("/api/deploy", &json!({ "websiteId": id })).await
    }

    pub async fn publish(&self, id: &str) -> Result<PublishResult, SdkError> {
        self.post(&format!("/api/websites/{}/publish", id), &json!({}))
            .await
    }

    pub async fn unpublish(&self, id: &str) -> Result<Website, SdkError> {
        self.post(&format!("/api/websites/{}/unpublish", id), &json!({}))
            .await
    }

    pub async fn submit_rsvp(&self, req: &RsvpRequest) -> Result<Rsvp, SdkError> {
        self.post("/api/rsvp", req).await
    }

    pub async fn list_rsvps(&self, id: &str) -> Result<Vec<Rsvp>, SdkError> {
        let res = self
            .client
            .get(self.url(&format!("/api/websites/{}/rsvps", id)))
            .send()
            .await?;
        parse(res).await
    }

    pub async fn health(&self) -> Result<Value, SdkError> {
        let res = self.client.get(self.url("/health")).send().await?;
        parse(res).await
    }

    /// Fetch a page with an explicit `Host`, as a tenant browser would.
    pub async fn get_with_host(&self, host: &str, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(path))
            .header(reqwest::header::HOST, host)
            .send()
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        let res = self.client.post(self.url(path)).json(body).send().await?;
        parse(res).await
    }
}

async fn parse<T: DeserializeOwned>(res: Response) -> Result<T, SdkError> {
    let status = res.status();
    let envelope: Envelope<T> = match res.json().await {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(SdkError::Http(e)),
        Err(_) => {
            return Err(SdkError::Api {
                status,
                error: None,
                details: Vec::new(),
            })
        }
    };

    match envelope.data {
        Some(data) if status.is_success() && envelope.success => Ok(data),
        _ => Err(SdkError::Api {
            status,
            error: envelope.error,
            details: envelope.details,
        }),
    }
}
