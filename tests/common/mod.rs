//! Shared test fixtures: an in-memory Storage with failure injection.

#![allow(dead_code)]

use std::sync::Once;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use mailtrack::config::init_config;
use mailtrack::errors::{Result, TrackerError};
use mailtrack::storage::{OpenEvent, OpenedPixelRow, Pixel, Storage, TrackedLink};

static INIT: Once = Once::new();

pub fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

#[derive(Debug, Clone)]
pub struct ClickRecord {
    pub link_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub clicked_at: DateTime<Utc>,
}

/// In-memory Storage. Each per-table failure flag makes the matching
/// insert return a database error, for exercising degraded paths.
#[derive(Default)]
pub struct MemoryStorage {
    pixels: RwLock<Vec<Pixel>>,
    links: RwLock<Vec<TrackedLink>>,
    events: RwLock<Vec<OpenEvent>>,
    clicks: RwLock<Vec<ClickRecord>>,
    next_event_id: AtomicI64,
    pub fail_pixels: AtomicBool,
    pub fail_links: AtomicBool,
    pub fail_open_events: AtomicBool,
    pub fail_click_events: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_event_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    // ---- seeding helpers (bypass the trait, allow custom timestamps) ----

    pub async fn seed_pixel_at(&self, email: &str, created_at: DateTime<Utc>) -> Pixel {
        let pixel = Pixel {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            created_at,
        };
        self.pixels.write().await.push(pixel.clone());
        pixel
    }

    pub async fn seed_pixel(&self, email: &str) -> Pixel {
        self.seed_pixel_at(email, Utc::now()).await
    }

    pub async fn seed_link(&self, pixel_id: &str, destination_url: &str) -> TrackedLink {
        let link = TrackedLink {
            id: Uuid::new_v4().to_string(),
            pixel_id: pixel_id.to_string(),
            destination_url: destination_url.to_string(),
            created_at: Utc::now(),
        };
        self.links.write().await.push(link.clone());
        link
    }

    pub async fn seed_open_at(&self, pixel_id: &str, opened_at: DateTime<Utc>) {
        let event = OpenEvent {
            id: self.next_id(),
            pixel_id: pixel_id.to_string(),
            ip_address: "10.0.0.1".to_string(),
            user_agent: "seed".to_string(),
            opened_at,
        };
        self.events.write().await.push(event);
    }

    // ---- inspection helpers ----

    pub async fn open_event_count(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn open_events_for(&self, pixel_id: &str) -> Vec<OpenEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.pixel_id == pixel_id)
            .cloned()
            .collect()
    }

    pub async fn click_records(&self) -> Vec<ClickRecord> {
        self.clicks.read().await.clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_pixel(&self, email: &str) -> Result<Pixel> {
        if self.fail_pixels.load(Ordering::SeqCst) {
            return Err(TrackerError::database_operation("injected pixel failure"));
        }
        Ok(self.seed_pixel(email).await)
    }

    async fn get_pixel(&self, id: &str) -> Result<Option<Pixel>> {
        Ok(self
            .pixels
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_pixels(&self) -> Result<Vec<Pixel>> {
        let mut pixels = self.pixels.read().await.clone();
        pixels.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pixels)
    }

    async fn count_pixels(&self) -> Result<u64> {
        Ok(self.pixels.read().await.len() as u64)
    }

    async fn insert_links(&self, pixel_id: &str, urls: &[String]) -> Result<Vec<TrackedLink>> {
        if self.fail_links.load(Ordering::SeqCst) {
            return Err(TrackerError::database_operation("injected link failure"));
        }
        let mut created = Vec::with_capacity(urls.len());
        for url in urls {
            created.push(self.seed_link(pixel_id, url).await);
        }
        Ok(created)
    }

    async fn get_link(&self, id: &str) -> Result<Option<TrackedLink>> {
        Ok(self.links.read().await.iter().find(|l| l.id == id).cloned())
    }

    async fn links_for_pixel(&self, pixel_id: &str) -> Result<Vec<TrackedLink>> {
        let mut links: Vec<TrackedLink> = self
            .links
            .read()
            .await
            .iter()
            .filter(|l| l.pixel_id == pixel_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(links)
    }

    async fn insert_open_event(
        &self,
        pixel_id: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<()> {
        if self.fail_open_events.load(Ordering::SeqCst) {
            return Err(TrackerError::database_operation("injected event failure"));
        }
        let event = OpenEvent {
            id: self.next_id(),
            pixel_id: pixel_id.to_string(),
            ip_address: ip_address.to_string(),
            user_agent: user_agent.to_string(),
            opened_at: Utc::now(),
        };
        self.events.write().await.push(event);
        Ok(())
    }

    async fn insert_click_event(
        &self,
        link_id: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<()> {
        if self.fail_click_events.load(Ordering::SeqCst) {
            return Err(TrackerError::database_operation("injected click failure"));
        }
        self.clicks.write().await.push(ClickRecord {
            link_id: link_id.to_string(),
            ip_address: ip_address.to_string(),
            user_agent: user_agent.to_string(),
            clicked_at: Utc::now(),
        });
        Ok(())
    }

    async fn events_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<OpenEvent>> {
        let mut events: Vec<OpenEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.pixel_id == pixel_id && e.opened_at >= cutoff)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        Ok(events)
    }

    async fn count_events_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<u64> {
        Ok(self.events_since(pixel_id, cutoff).await?.len() as u64)
    }

    async fn has_event_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<bool> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .any(|e| e.pixel_id == pixel_id && e.opened_at >= cutoff))
    }

    async fn count_clicks(&self, link_id: &str) -> Result<u64> {
        Ok(self
            .clicks
            .read()
            .await
            .iter()
            .filter(|c| c.link_id == link_id)
            .count() as u64)
    }

    async fn open_events_with_pixel_created(&self) -> Result<Vec<OpenedPixelRow>> {
        let pixels = self.pixels.read().await;
        let rows = self
            .events
            .read()
            .await
            .iter()
            .filter_map(|event| {
                pixels
                    .iter()
                    .find(|p| p.id == event.pixel_id)
                    .map(|pixel| OpenedPixelRow {
                        pixel_id: event.pixel_id.clone(),
                        opened_at: event.opened_at,
                        pixel_created_at: pixel.created_at,
                    })
            })
            .collect();
        Ok(rows)
    }
}
