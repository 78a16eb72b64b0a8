use chrono::{NaiveDate, Utc};
use minijinja::{default_auto_escape_callback, Environment};
use thiserror::Error;

use crate::error::AppError;
use crate::sites::{Rsvp, Website};

use super::view::PageView;

#[derive(Debug, Error)]
#[error("failed to render {template}: {source}")]
pub struct RenderError {
    template: String,
    #[source]
    source: minijinja::Error,
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err.to_string())
    }
}

/// Renders tenant pages from the embedded layout and section templates.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        Self { env }
    }

    /// Full HTML document for a site, using its template's descriptor.
    pub fn render_site(
        &self,
        website: &Website,
        rsvps: &[Rsvp],
        api_url: &str,
    ) -> Result<String, RenderError> {
        self.render_site_on(website, rsvps, api_url, Utc::now().date_naive())
    }

    pub fn render_site_on(
        &self,
        website: &Website,
        rsvps: &[Rsvp],
        api_url: &str,
        today: NaiveDate,
    ) -> Result<String, RenderError> {
        let descriptor = website.template_id.descriptor();
        let view = PageView::build(descriptor, website, rsvps, api_url, today);
        self.render("page.html", minijinja::Value::from_serialize(&view))
    }

    /// The page served for unknown, malformed and unpublished subdomains.
    pub fn render_not_found(&self, subdomain: &str) -> Result<String, RenderError> {
        self.render("not_found.html", minijinja::context! { subdomain })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, RenderError> {
        let wrap = |source| RenderError {
            template: name.to_string(),
            source,
        };
        let tmpl = self.env.get_template(name).map_err(wrap)?;
        tmpl.render(ctx).map_err(wrap)
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        "page.html" => Some(include_str!("html/page.html")),
        "not_found.html" => Some(include_str!("html/not_found.html")),

        // Sections, in page order
        "sections/hero.html" => Some(include_str!("html/sections/hero.html")),
        "sections/countdown.html" => Some(include_str!("html/sections/countdown.html")),
        "sections/story.html" => Some(include_str!("html/sections/story.html")),
        "sections/events.html" => Some(include_str!("html/sections/events.html")),
        "sections/gallery.html" => Some(include_str!("html/sections/gallery.html")),
        "sections/rsvp.html" => Some(include_str!("html/sections/rsvp.html")),
        "sections/footer.html" => Some(include_str!("html/sections/footer.html")),

        // Per-template stylesheets
        "themes/classic-elegance.html" => Some(include_str!("html/themes/classic-elegance.html")),
        "themes/modern-minimal.html" => Some(include_str!("html/themes/modern-minimal.html")),
        "themes/rustic-charm.html" => Some(include_str!("html/themes/rustic-charm.html")),

        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}
