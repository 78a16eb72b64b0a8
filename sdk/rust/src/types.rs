use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope shared by every JSON endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<FieldError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebsite {
    pub template_id: String,
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub subdomain: String,
    pub template_id: String,
    pub published: bool,
    pub published_at: Option<String>,
    pub deployment_url: Option<String>,
    pub deployment_id: Option<String>,
    /// Full content document as returned by the server.
    pub content: Value,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishResult {
    pub url: String,
    pub message: String,
    /// `cached`, `on_demand_cache_unconfigured` or `on_demand_render_failed`.
    pub mode: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub subdomain: String,
    pub guest_name: String,
    pub email: String,
    pub attending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plus_one: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plus_one_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: String,
    pub website_id: String,
    pub guest_name: String,
    pub email: String,
    pub attending: bool,
    pub plus_one: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
}
