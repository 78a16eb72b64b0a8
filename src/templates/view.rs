//! Flattening a site into the context the page layout renders.

use chrono::NaiveDate;
use serde::Serialize;

use crate::sites::{Rsvp, Website};
use crate::sites::types::{EventInfo, TimelineEvent};

use super::registry::TemplateDescriptor;

const DATE_FORMAT: &str = "%B %-d, %Y";
const TIME_FORMAT: &str = "%-I:%M %p";

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub template_id: &'static str,
    pub body_class: &'static str,
    pub stylesheet: &'static str,
    pub subdomain: &'a str,
    pub couple: String,
    pub wedding_date: String,
    pub theme: Theme,
    pub hero: Option<Hero>,
    pub countdown: Option<Countdown>,
    pub story: Option<Story<'a>>,
    /// Empty when the events section is hidden or has nothing to show.
    pub events: Vec<EventView<'a>>,
    pub gallery: Vec<GalleryPhoto>,
    pub rsvp: Option<RsvpForm>,
}

#[derive(Debug, Serialize)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: &'static str,
    pub background: &'static str,
    pub heading_font: String,
    pub body_font: String,
}

#[derive(Debug, Serialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Countdown {
    /// Midnight of the wedding day, read by the ticking script.
    pub target: String,
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct Story<'a> {
    pub title: &'a str,
    pub content: Option<&'a str>,
    pub timeline: &'a [TimelineEvent],
}

#[derive(Debug, Serialize)]
pub struct EventView<'a> {
    pub label: &'static str,
    pub badge: &'static str,
    pub venue: &'a str,
    pub time: Option<String>,
    pub address: Option<&'a str>,
    pub map_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryPhoto {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Serialize)]
pub struct RsvpForm {
    pub endpoint: String,
    pub attending_count: usize,
}

impl<'a> PageView<'a> {
    pub fn build(
        descriptor: &'static TemplateDescriptor,
        website: &'a Website,
        rsvps: &[Rsvp],
        api_url: &str,
        today: NaiveDate,
    ) -> Self {
        let content = &website.content;
        let sections = &content.sections;
        let couple = format!("{} & {}", content.bride_name, content.groom_name);
        let wedding_date = content.wedding_date.format(DATE_FORMAT).to_string();

        let theme = Theme {
            primary: content.primary_color.clone(),
            secondary: content.secondary_color.clone(),
            accent: content
                .accent_color
                .clone()
                .unwrap_or_else(|| descriptor.colors.accent.to_string()),
            text: descriptor.colors.text,
            background: descriptor.colors.background,
            heading_font: format!("{}, {}, serif", content.font_family, descriptor.fonts.heading),
            body_font: format!("{}, sans-serif", descriptor.fonts.body),
        };

        let hero = sections.hero.then(|| Hero {
            title: content.hero_title.clone().unwrap_or_else(|| couple.clone()),
            subtitle: content
                .hero_subtitle
                .clone()
                .unwrap_or_else(|| wedding_date.clone()),
            image: content.hero_image.as_deref().and_then(css_safe_url),
        });

        let countdown = sections.countdown.then(|| Countdown {
            target: format!("{}T00:00:00", content.wedding_date.format("%Y-%m-%d")),
            days: (content.wedding_date - today).num_days().max(0),
        });

        let story_content = content.story_content.as_deref().filter(|s| !s.trim().is_empty());
        let story = (sections.story && (story_content.is_some() || !content.timeline.is_empty()))
            .then(|| Story {
                title: content.story_title.as_deref().unwrap_or("Our Story"),
                content: story_content,
                timeline: &content.timeline,
            });

        let events = if sections.events {
            [
                event_view("Ceremony", "💒", &content.ceremony),
                event_view("Reception", "🎉", &content.reception),
            ]
            .into_iter()
            .flatten()
            .collect()
        } else {
            Vec::new()
        };

        let gallery = if sections.gallery {
            let mut photos: Vec<_> = website.photos.iter().collect();
            photos.sort_by_key(|p| p.order);
            photos
                .into_iter()
                .map(|p| GalleryPhoto {
                    url: p.url.clone(),
                    alt: p.caption.clone().unwrap_or_else(|| "Wedding photo".to_string()),
                })
                .collect()
        } else {
            Vec::new()
        };

        let rsvp = sections.rsvp.then(|| RsvpForm {
            endpoint: format!("{}/api/rsvp", api_url.trim_end_matches('/')),
            attending_count: rsvps.iter().filter(|r| r.attending).count(),
        });

        Self {
            template_id: descriptor.id.as_str(),
            body_class: descriptor.wrapper_class,
            stylesheet: descriptor.stylesheet,
            subdomain: website.subdomain.as_str(),
            couple,
            wedding_date,
            theme,
            hero,
            countdown,
            story,
            events,
            gallery,
            rsvp,
        }
    }
}

fn event_view<'a>(
    label: &'static str,
    badge: &'static str,
    info: &'a EventInfo,
) -> Option<EventView<'a>> {
    let venue = info.venue.as_deref().filter(|v| !v.trim().is_empty())?;
    Some(EventView {
        label,
        badge,
        venue,
        time: info.time.map(|t| t.format(TIME_FORMAT).to_string()),
        address: info.address.as_deref(),
        map_url: info.map_url.clone(),
    })
}

/// Normalized form of an http(s) URL, percent-encoding quotes so it can sit
/// inside a CSS `url("...")`.
fn css_safe_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| String::from(parsed))
}
