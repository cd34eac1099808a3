use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{OpenEvent, OpenedPixelRow, Pixel, TrackedLink};

/// Durable store for the four record kinds: pixels, links, events,
/// link_events.
///
/// Reads distinguish "not found" (`Ok(None)`) from query errors (`Err`).
/// Event inserts are append-only; nothing here updates or deletes rows.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn insert_pixel(&self, email: &str) -> Result<Pixel>;
    async fn get_pixel(&self, id: &str) -> Result<Option<Pixel>>;
    /// 按创建时间降序
    async fn list_pixels(&self) -> Result<Vec<Pixel>>;
    async fn count_pixels(&self) -> Result<u64>;

    /// 批量插入链接，全部归属同一像素
    async fn insert_links(&self, pixel_id: &str, urls: &[String]) -> Result<Vec<TrackedLink>>;
    async fn get_link(&self, id: &str) -> Result<Option<TrackedLink>>;
    /// 按创建时间升序
    async fn links_for_pixel(&self, pixel_id: &str) -> Result<Vec<TrackedLink>>;

    async fn insert_open_event(&self, pixel_id: &str, ip_address: &str, user_agent: &str)
    -> Result<()>;
    async fn insert_click_event(&self, link_id: &str, ip_address: &str, user_agent: &str)
    -> Result<()>;

    /// 某像素在 cutoff 及之后的打开事件，按 opened_at 降序
    async fn events_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<OpenEvent>>;
    async fn count_events_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<u64>;
    /// 存在性检查，LIMIT 1 短路
    async fn has_event_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<bool>;

    async fn count_clicks(&self, link_id: &str) -> Result<u64>;

    /// 所有打开事件连同其所属像素的创建时间（event → pixel 单层 join）
    async fn open_events_with_pixel_created(&self) -> Result<Vec<OpenedPixelRow>>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<dyn Storage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = backend::SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
