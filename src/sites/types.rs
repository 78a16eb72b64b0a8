//! Tenant site records and the inputs that create or change them.
//!
//! Inputs are parsed into validated types at the serde boundary; nothing
//! past this module handles raw subdomains, dates or colors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::error::{AppError, AppResult, ValidationErrors};
use crate::templates::TemplateId;

/// Labels that can never be claimed by a tenant.
pub const RESERVED_SUBDOMAINS: &[&str] = &["www", "api", "app", "admin", "mail", "static"];

const SUBDOMAIN_MIN: usize = 3;
const SUBDOMAIN_MAX: usize = 50;
const NAME_MAX: usize = 100;
const TEXT_MAX: usize = 500;
const STORY_MAX: usize = 10_000;

/// A validated tenant subdomain label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdomain(String);

impl Subdomain {
    /// Parse a label: lowercase alphanumerics and `-`, 3 to 50 chars.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let len = raw.len();
        if !(SUBDOMAIN_MIN..=SUBDOMAIN_MAX).contains(&len) {
            return Err(format!(
                "must be between {} and {} characters",
                SUBDOMAIN_MIN, SUBDOMAIN_MAX
            ));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err("may only contain lowercase letters, digits and hyphens".to_string());
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err("must not start or end with a hyphen".to_string());
        }
        if RESERVED_SUBDOMAINS.contains(&raw) {
            return Err(format!("'{}' is reserved", raw));
        }
        Ok(Self(raw.to_string()))
    }

    /// Build the default label for a couple, e.g. "Mary Ann" + "John" → "mary-ann-john".
    pub fn derive(bride_name: &str, groom_name: &str) -> Result<Self, String> {
        let joined = format!("{}-{}", bride_name.trim(), groom_name.trim()).to_lowercase();
        let mut label = String::with_capacity(joined.len());
        for c in joined.chars() {
            if c.is_whitespace() || c == '-' {
                if !label.ends_with('-') {
                    label.push('-');
                }
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
                label.push(c);
            }
        }
        Self::parse(label.trim_matches('-'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Subdomain {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Subdomain> for String {
    fn from(value: Subdomain) -> Self {
        value.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Hash must agree with `str` so map lookups can use `Borrow<str>`.
impl Hash for Subdomain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl Borrow<str> for Subdomain {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Per-section visibility toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sections {
    pub hero: bool,
    pub countdown: bool,
    pub story: bool,
    pub events: bool,
    pub rsvp: bool,
    pub gallery: bool,
    pub travel: bool,
    pub faq: bool,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            hero: true,
            countdown: true,
            story: true,
            events: true,
            rsvp: true,
            gallery: true,
            travel: false,
            faq: false,
        }
    }
}

/// One entry of the couple's story timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(default)]
    pub id: String,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Ceremony or reception details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

/// Everything a template renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteContent {
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: NaiveDate,

    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    pub font_family: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_content: Option<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,

    #[serde(default)]
    pub ceremony: EventInfo,
    #[serde(default)]
    pub reception: EventInfo,

    #[serde(default)]
    pub sections: Sections,
}

impl WebsiteContent {
    /// Content for a freshly created site, themed with the template's palette.
    pub fn initial(
        template_id: TemplateId,
        bride_name: String,
        groom_name: String,
        wedding_date: NaiveDate,
    ) -> Self {
        let descriptor = template_id.descriptor();
        Self {
            bride_name,
            groom_name,
            wedding_date,
            primary_color: descriptor.colors.primary.to_string(),
            secondary_color: descriptor.colors.secondary.to_string(),
            accent_color: None,
            font_family: descriptor.fonts.heading.to_string(),
            hero_image: None,
            hero_title: None,
            hero_subtitle: None,
            story_title: None,
            story_content: None,
            timeline: Vec::new(),
            ceremony: EventInfo::default(),
            reception: EventInfo::default(),
            sections: Sections::default(),
        }
    }
}

/// A gallery photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub order: i32,
    pub uploaded_at: DateTime<Utc>,
}

/// A tenant site record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: Uuid,
    pub subdomain: Subdomain,
    pub template_id: TemplateId,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub content: WebsiteContent,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// A guest RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: Uuid,
    pub website_id: Uuid,
    pub guest_name: String,
    pub email: String,
    pub attending: bool,
    pub plus_one: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plus_one_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Deployment details recorded by a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRecord {
    pub deployment_url: String,
    pub deployment_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// `POST /api/websites` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebsiteInput {
    pub template_id: String,
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: String,
    #[serde(default)]
    pub subdomain: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct NewWebsite {
    pub subdomain: Subdomain,
    pub template_id: TemplateId,
    pub content: WebsiteContent,
}

impl CreateWebsiteInput {
    pub fn validate(self) -> AppResult<NewWebsite> {
        let mut errors = ValidationErrors::new();

        let template_id = match self.template_id.parse::<TemplateId>() {
            Ok(id) => Some(id),
            Err(e) => {
                errors.push("templateId", e.to_string());
                None
            }
        };
        let bride_name = check_name(&mut errors, "brideName", &self.bride_name);
        let groom_name = check_name(&mut errors, "groomName", &self.groom_name);
        let wedding_date = match parse_date(&self.wedding_date) {
            Some(date) => Some(date),
            None => {
                errors.push("weddingDate", "expected a date like 2025-06-21");
                None
            }
        };

        let subdomain = match self.subdomain.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Subdomain::parse(&raw.to_lowercase()),
            _ => Subdomain::derive(&self.bride_name, &self.groom_name),
        };
        let subdomain = match subdomain {
            Ok(s) => Some(s),
            Err(e) => {
                errors.push("subdomain", e);
                None
            }
        };

        match (template_id, bride_name, groom_name, wedding_date, subdomain) {
            (Some(template_id), Some(bride), Some(groom), Some(date), Some(subdomain))
                if errors.is_empty() =>
            {
                Ok(NewWebsite {
                    subdomain,
                    template_id,
                    content: WebsiteContent::initial(template_id, bride, groom, date),
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// `PATCH /api/websites/{id}` body. Absent fields are left alone; empty
/// strings clear optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebsiteInput {
    pub template_id: Option<String>,
    pub bride_name: Option<String>,
    pub groom_name: Option<String>,
    pub wedding_date: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
    pub hero_image: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub story_title: Option<String>,
    pub story_content: Option<String>,
    pub timeline: Option<Vec<TimelineEvent>>,
    pub ceremony_venue: Option<String>,
    pub ceremony_time: Option<String>,
    pub ceremony_address: Option<String>,
    pub ceremony_map_url: Option<String>,
    pub reception_venue: Option<String>,
    pub reception_time: Option<String>,
    pub reception_address: Option<String>,
    pub reception_map_url: Option<String>,
    pub sections: Option<Sections>,
}

impl UpdateWebsiteInput {
    /// Validate the patch and apply it to a copy of the current state.
    pub fn apply(
        self,
        template_id: TemplateId,
        current: &WebsiteContent,
    ) -> AppResult<(TemplateId, WebsiteContent)> {
        let mut errors = ValidationErrors::new();
        let mut content = current.clone();

        let template_id = match self.template_id.as_deref() {
            Some(raw) => raw.parse::<TemplateId>().unwrap_or_else(|e| {
                errors.push("templateId", e.to_string());
                template_id
            }),
            None => template_id,
        };

        if let Some(name) = self.bride_name {
            if let Some(name) = check_name(&mut errors, "brideName", &name) {
                content.bride_name = name;
            }
        }
        if let Some(name) = self.groom_name {
            if let Some(name) = check_name(&mut errors, "groomName", &name) {
                content.groom_name = name;
            }
        }
        if let Some(raw) = self.wedding_date {
            match parse_date(&raw) {
                Some(date) => content.wedding_date = date,
                None => errors.push("weddingDate", "expected a date like 2025-06-21"),
            }
        }
        if let Some(color) = self.primary_color {
            if check_color(&mut errors, "primaryColor", &color) {
                content.primary_color = color.trim().to_string();
            }
        }
        if let Some(color) = self.secondary_color {
            if check_color(&mut errors, "secondaryColor", &color) {
                content.secondary_color = color.trim().to_string();
            }
        }
        if let Some(color) = self.accent_color {
            content.accent_color = match clear_or(color) {
                Some(color) if check_color(&mut errors, "accentColor", &color) => Some(color),
                Some(_) => content.accent_color.take(),
                None => None,
            };
        }
        if let Some(font) = self.font_family {
            match clear_or(font) {
                Some(font) if is_font_name(&font) => content.font_family = font,
                Some(_) => errors.push(
                    "fontFamily",
                    "only letters, digits, spaces and hyphens are allowed",
                ),
                None => errors.push("fontFamily", "must not be empty"),
            }
        }
        if let Some(url) = self.hero_image {
            content.hero_image = check_url(&mut errors, "heroImage", url);
        }
        if let Some(title) = self.hero_title {
            content.hero_title = check_text(&mut errors, "heroTitle", title, NAME_MAX);
        }
        if let Some(subtitle) = self.hero_subtitle {
            content.hero_subtitle = check_text(&mut errors, "heroSubtitle", subtitle, TEXT_MAX);
        }
        if let Some(title) = self.story_title {
            content.story_title = check_text(&mut errors, "storyTitle", title, NAME_MAX);
        }
        if let Some(story) = self.story_content {
            content.story_content = check_text(&mut errors, "storyContent", story, STORY_MAX);
        }
        if let Some(timeline) = self.timeline {
            for (i, event) in timeline.iter().enumerate() {
                if event.title.trim().is_empty() {
                    errors.push(format!("timeline[{}].title", i), "must not be empty");
                }
            }
            content.timeline = timeline
                .into_iter()
                .enumerate()
                .map(|(i, mut event)| {
                    if event.id.is_empty() {
                        event.id = format!("t{}", i + 1);
                    }
                    event
                })
                .collect();
        }

        apply_event(
            &mut errors,
            "ceremony",
            &mut content.ceremony,
            EventPatch {
                venue: self.ceremony_venue,
                time: self.ceremony_time,
                address: self.ceremony_address,
                map_url: self.ceremony_map_url,
            },
        );
        apply_event(
            &mut errors,
            "reception",
            &mut content.reception,
            EventPatch {
                venue: self.reception_venue,
                time: self.reception_time,
                address: self.reception_address,
                map_url: self.reception_map_url,
            },
        );

        if let Some(sections) = self.sections {
            content.sections = sections;
        }

        errors.into_result()?;
        Ok((template_id, content))
    }
}

struct EventPatch {
    venue: Option<String>,
    time: Option<String>,
    address: Option<String>,
    map_url: Option<String>,
}

fn apply_event(errors: &mut ValidationErrors, prefix: &str, event: &mut EventInfo, patch: EventPatch) {
    if let Some(venue) = patch.venue {
        event.venue = check_text(errors, &format!("{}Venue", prefix), venue, NAME_MAX);
    }
    if let Some(raw) = patch.time {
        match clear_or(raw) {
            Some(raw) => match parse_datetime(&raw) {
                Some(time) => event.time = Some(time),
                None => errors.push(
                    format!("{}Time", prefix),
                    "expected a date-time like 2025-06-21T14:00",
                ),
            },
            None => event.time = None,
        }
    }
    if let Some(address) = patch.address {
        event.address = check_text(errors, &format!("{}Address", prefix), address, TEXT_MAX);
    }
    if let Some(url) = patch.map_url {
        event.map_url = check_url(errors, &format!("{}MapUrl", prefix), url);
    }
}

/// `POST /api/websites/{id}/photos` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhotoInput {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

impl NewPhotoInput {
    pub fn validate(self) -> AppResult<NewPhotoInput> {
        let mut errors = ValidationErrors::new();
        let url = check_url(&mut errors, "url", self.url);
        if url.is_none() && errors.is_empty() {
            errors.push("url", "must not be empty");
        }
        let caption = self
            .caption
            .and_then(|c| check_text(&mut errors, "caption", c, TEXT_MAX));
        errors.into_result()?;
        Ok(NewPhotoInput {
            url: url.unwrap_or_default(),
            caption,
            order: self.order,
        })
    }
}

/// `POST /api/rsvp` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    pub subdomain: String,
    pub guest_name: String,
    pub email: String,
    pub attending: bool,
    #[serde(default)]
    pub plus_one: Option<bool>,
    #[serde(default)]
    pub plus_one_name: Option<String>,
    #[serde(default)]
    pub dietary_requirements: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// An RSVP that passed field checks; the subdomain is resolved by the store.
#[derive(Debug, Clone)]
pub struct NewRsvp {
    pub subdomain: String,
    pub guest_name: String,
    pub email: String,
    pub attending: bool,
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    pub dietary_requirements: Option<String>,
    pub message: Option<String>,
}

impl RsvpSubmission {
    pub fn validate(self) -> AppResult<NewRsvp> {
        let mut errors = ValidationErrors::new();

        let subdomain = match Subdomain::parse(&self.subdomain.trim().to_lowercase()) {
            Ok(subdomain) => Some(subdomain),
            Err(e) => {
                errors.push("subdomain", e);
                None
            }
        };
        let guest_name = check_name(&mut errors, "guestName", &self.guest_name);
        let email = self.email.trim().to_string();
        if !is_plausible_email(&email) {
            errors.push("email", "must be a valid email address");
        }
        let plus_one = self.plus_one.unwrap_or(false);
        let plus_one_name = self
            .plus_one_name
            .and_then(|n| check_text(&mut errors, "plusOneName", n, NAME_MAX));
        if plus_one_name.is_some() && !plus_one {
            errors.push("plusOneName", "only allowed when plusOne is true");
        }
        let dietary_requirements = self
            .dietary_requirements
            .and_then(|d| check_text(&mut errors, "dietaryRequirements", d, TEXT_MAX));
        let message = self
            .message
            .and_then(|m| check_text(&mut errors, "message", m, TEXT_MAX));

        errors.into_result()?;
        Ok(NewRsvp {
            subdomain: subdomain.map(String::from).unwrap_or_default(),
            guest_name: guest_name.unwrap_or_default(),
            email,
            attending: self.attending,
            plus_one,
            plus_one_name,
            dietary_requirements,
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn clear_or(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_name(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "must not be empty");
        None
    } else if trimmed.chars().count() > NAME_MAX {
        errors.push(field, format!("must be at most {} characters", NAME_MAX));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn check_text(errors: &mut ValidationErrors, field: &str, value: String, max: usize) -> Option<String> {
    let value = clear_or(value)?;
    if value.chars().count() > max {
        errors.push(field, format!("must be at most {} characters", max));
        return None;
    }
    Some(value)
}

fn check_url(errors: &mut ValidationErrors, field: &str, value: String) -> Option<String> {
    let value = clear_or(value)?;
    match url::Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(value),
        _ => {
            errors.push(field, "must be an http(s) URL");
            None
        }
    }
}

fn check_color(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    let ok = is_hex_color(value.trim());
    if !ok {
        errors.push(field, "must be a hex color like #8B7355");
    }
    ok
}

/// `#RGB` or `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Font names are written unquoted into a stylesheet, so every word must be
/// a plain CSS identifier.
fn is_font_name(value: &str) -> bool {
    value.len() <= NAME_MAX
        && value.split_whitespace().all(|word| {
            word.starts_with(|c: char| c.is_ascii_alphabetic())
                && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn is_plausible_email(value: &str) -> bool {
    if value.len() > 254 || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// Accepts `2025-06-21` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Accepts `2025-06-21T14:00`, `2025-06-21T14:00:00` or RFC 3339.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}
