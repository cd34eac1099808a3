//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations. Events and link
//! events are append-only; nothing here updates or deletes rows.

use sea_orm::EntityTrait;
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{
    new_event_active_model, new_link_active_model, new_link_event_active_model,
    new_pixel_active_model,
};
use crate::errors::{Result, TrackerError};
use crate::storage::models::{Pixel, TrackedLink};

use migration::entities::{event, link, link_event, pixel};

impl SeaOrmStorage {
    pub async fn insert_pixel(&self, email: &str) -> Result<Pixel> {
        let (active, domain) = new_pixel_active_model(email);

        pixel::Entity::insert(active)
            .exec(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("创建像素失败: {}", e)))?;

        info!("Pixel created: {} ({})", domain.id, domain.email);
        Ok(domain)
    }

    /// 单批次插入链接，全部归属同一像素
    pub async fn insert_links(&self, pixel_id: &str, urls: &[String]) -> Result<Vec<TrackedLink>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let mut actives = Vec::with_capacity(urls.len());
        let mut domains = Vec::with_capacity(urls.len());
        for url in urls {
            let (active, domain) = new_link_active_model(pixel_id, url);
            actives.push(active);
            domains.push(domain);
        }

        link::Entity::insert_many(actives)
            .exec(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("批量创建链接失败: {}", e)))?;

        info!("Created {} links for pixel {}", domains.len(), pixel_id);
        Ok(domains)
    }

    pub async fn insert_open_event(
        &self,
        pixel_id: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<()> {
        event::Entity::insert(new_event_active_model(pixel_id, ip_address, user_agent))
            .exec(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("记录打开事件失败: {}", e)))?;
        Ok(())
    }

    pub async fn insert_click_event(
        &self,
        link_id: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<()> {
        link_event::Entity::insert(new_link_event_active_model(link_id, ip_address, user_agent))
            .exec(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("记录点击事件失败: {}", e)))?;
        Ok(())
    }
}
