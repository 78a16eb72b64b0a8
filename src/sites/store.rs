//! In-process site storage and persistence.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::observability::metrics;
use crate::sites::types::{
    NewPhotoInput, NewRsvp, NewWebsite, Photo, PublishRecord, Rsvp, Subdomain,
    UpdateWebsiteInput, Website,
};

/// On-disk snapshot format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    websites: Vec<Website>,
    rsvps: Vec<Rsvp>,
}

/// A thread-safe store of tenant sites and their RSVPs.
///
/// Constructed once at startup and handed to the HTTP layer and the
/// publish pipeline. Clones share the same maps.
#[derive(Clone, Default)]
pub struct SiteStore {
    websites: Arc<DashMap<Uuid, Website>>,
    /// Subdomain → website id. Claiming an entry here is what makes a
    /// subdomain taken.
    by_subdomain: Arc<DashMap<Subdomain, Uuid>>,
    rsvps: Arc<DashMap<Uuid, Vec<Rsvp>>>,
    persistence_path: Option<String>,
}

impl SiteStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<String>) -> Self {
        Self {
            persistence_path,
            ..Self::default()
        }
    }

    /// Load from file if it exists, otherwise start empty.
    pub fn load_from_file(path: &str) -> std::io::Result<Self> {
        let store = Self::new(Some(path.to_string()));
        if Path::new(path).exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let snapshot: StoreSnapshot = serde_json::from_reader(reader)?;

            for site in snapshot.websites {
                store.by_subdomain.insert(site.subdomain.clone(), site.id);
                store.websites.insert(site.id, site);
            }
            for rsvp in snapshot.rsvps {
                store.rsvps.entry(rsvp.website_id).or_default().push(rsvp);
            }
            metrics::record_site_count(store.websites.len());
            tracing::info!(
                websites = store.websites.len(),
                path = %path,
                "Loaded site snapshot"
            );
        }
        Ok(store)
    }

    /// Save to file when a persistence path is configured.
    pub fn save_to_file(&self) -> AppResult<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let saved = self
            .write_snapshot(path)
            .map_err(|e| AppError::Storage(format!("{}: {}", path, e)))?;
        tracing::info!(websites = saved, path = %path, "Saved site snapshot");
        Ok(())
    }

    fn write_snapshot(&self, path: &str) -> std::io::Result<usize> {
        let writer = BufWriter::new(File::create(path)?);

        let mut websites: Vec<Website> = self.websites.iter().map(|r| r.value().clone()).collect();
        websites.sort_by_key(|w| w.created_at);
        let mut rsvps: Vec<Rsvp> = self
            .rsvps
            .iter()
            .flat_map(|r| r.value().clone())
            .collect();
        rsvps.sort_by_key(|r| r.created_at);

        let snapshot = StoreSnapshot { websites, rsvps };
        serde_json::to_writer(writer, &snapshot)?;
        Ok(snapshot.websites.len())
    }

    /// Create a site, atomically claiming its subdomain.
    pub fn create(&self, new: NewWebsite) -> AppResult<Website> {
        match self.by_subdomain.entry(new.subdomain.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict {
                subdomain: new.subdomain.to_string(),
            }),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let site = Website {
                    id: Uuid::new_v4(),
                    subdomain: new.subdomain,
                    template_id: new.template_id,
                    published: false,
                    published_at: None,
                    deployment_url: None,
                    deployment_id: None,
                    created_at: now,
                    updated_at: now,
                    content: new.content,
                    photos: Vec::new(),
                };
                self.websites.insert(site.id, site.clone());
                slot.insert(site.id);
                metrics::record_site_count(self.websites.len());
                tracing::info!(website_id = %site.id, subdomain = %site.subdomain, "Website created");
                Ok(site)
            }
        }
    }

    pub fn get(&self, id: Uuid) -> AppResult<Website> {
        self.websites
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or_else(|| AppError::website_not_found(id))
    }

    /// Look up a site by subdomain regardless of published state.
    pub fn find_by_subdomain(&self, subdomain: &str) -> Option<Website> {
        let id = *self.by_subdomain.get(subdomain)?.value();
        self.websites.get(&id).map(|r| r.value().clone())
    }

    /// All sites, oldest first.
    pub fn list(&self) -> Vec<Website> {
        let mut sites: Vec<Website> = self.websites.iter().map(|r| r.value().clone()).collect();
        sites.sort_by_key(|w| w.created_at);
        sites
    }

    pub fn count(&self) -> usize {
        self.websites.len()
    }

    /// Apply a content patch. The record is untouched if validation fails.
    pub fn update(&self, id: Uuid, input: UpdateWebsiteInput) -> AppResult<Website> {
        let mut site = self
            .websites
            .get_mut(&id)
            .ok_or_else(|| AppError::website_not_found(id))?;
        let (template_id, content) = input.apply(site.template_id, &site.content)?;
        site.template_id = template_id;
        site.content = content;
        site.updated_at = Utc::now();
        Ok(site.clone())
    }

    /// Record a successful publish.
    pub fn mark_published(&self, id: Uuid, record: PublishRecord) -> AppResult<Website> {
        let mut site = self
            .websites
            .get_mut(&id)
            .ok_or_else(|| AppError::website_not_found(id))?;
        let now = Utc::now();
        site.published = true;
        site.published_at = Some(now);
        site.deployment_url = Some(record.deployment_url);
        if record.deployment_id.is_some() {
            site.deployment_id = record.deployment_id;
        }
        site.updated_at = now;
        Ok(site.clone())
    }

    /// Take a site offline and forget its deployment.
    pub fn mark_unpublished(&self, id: Uuid) -> AppResult<Website> {
        let mut site = self
            .websites
            .get_mut(&id)
            .ok_or_else(|| AppError::website_not_found(id))?;
        site.published = false;
        site.published_at = None;
        site.deployment_url = None;
        site.deployment_id = None;
        site.updated_at = Utc::now();
        Ok(site.clone())
    }

    /// Remove a site, its subdomain claim and its RSVPs.
    pub fn delete(&self, id: Uuid) -> AppResult<Website> {
        let (_, site) = self
            .websites
            .remove(&id)
            .ok_or_else(|| AppError::website_not_found(id))?;
        self.by_subdomain.remove(site.subdomain.as_str());
        self.rsvps.remove(&id);
        metrics::record_site_count(self.websites.len());
        tracing::info!(website_id = %id, subdomain = %site.subdomain, "Website deleted");
        Ok(site)
    }

    /// Append a gallery photo. Without an explicit order it goes last.
    pub fn add_photo(&self, id: Uuid, input: NewPhotoInput) -> AppResult<Photo> {
        let mut site = self
            .websites
            .get_mut(&id)
            .ok_or_else(|| AppError::website_not_found(id))?;
        let next_order = site.photos.iter().map(|p| p.order + 1).max().unwrap_or(0);
        let photo = Photo {
            id: Uuid::new_v4(),
            url: input.url,
            caption: input.caption,
            order: input.order.unwrap_or(next_order),
            uploaded_at: Utc::now(),
        };
        site.photos.push(photo.clone());
        site.updated_at = Utc::now();
        Ok(photo)
    }

    /// Record a guest RSVP against a published site.
    pub fn add_rsvp(&self, new: NewRsvp) -> AppResult<Rsvp> {
        let not_found = || AppError::subdomain_not_found(&new.subdomain);
        let id = *self
            .by_subdomain
            .get(new.subdomain.as_str())
            .ok_or_else(not_found)?;
        // Site guard held until the RSVP is stored; delete waits on it.
        let site = self
            .websites
            .get(&id)
            .filter(|site| site.published)
            .ok_or_else(not_found)?;

        let rsvp = Rsvp {
            id: Uuid::new_v4(),
            website_id: site.id,
            guest_name: new.guest_name,
            email: new.email,
            attending: new.attending,
            plus_one: new.plus_one,
            plus_one_name: new.plus_one_name,
            dietary_requirements: new.dietary_requirements,
            message: new.message,
            created_at: Utc::now(),
        };
        self.rsvps.entry(site.id).or_default().push(rsvp.clone());
        Ok(rsvp)
    }

    /// RSVPs for one site, in submission order.
    pub fn rsvps_for(&self, id: Uuid) -> AppResult<Vec<Rsvp>> {
        if !self.websites.contains_key(&id) {
            return Err(AppError::website_not_found(id));
        }
        Ok(self
            .rsvps
            .get(&id)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }
}
