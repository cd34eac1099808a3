//! Open/click analytics with prefetch correction.
//!
//! Mail clients and security scanners fetch embedded images and prescan
//! links immediately on delivery, long before a human opens the message.
//! An open event therefore only counts as genuine when it happened at
//! least `threshold` after its own pixel was created. The window is
//! configuration, not a constant, so it can be tuned without code changes.
//!
//! Clicks carry no timing filter: following a redirect is volitional.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;

use crate::errors::Result;
use crate::storage::{OpenEvent, Pixel, Storage, TrackedLink};

/// 仪表盘汇总
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_pixels: u64,
    pub opened_pixels: u64,
    /// 百分比，保留一位小数；没有像素时为 0.0
    pub conversion_rate: f64,
}

#[derive(Debug, Clone)]
pub struct LinkOverview {
    pub link: TrackedLink,
    pub clicks: u64,
}

#[derive(Debug, Clone)]
pub struct PixelOverview {
    pub pixel: Pixel,
    pub genuine_opens: u64,
    pub links: Vec<LinkOverview>,
}

/// Pure read-side aggregation over raw events. Never caches across calls:
/// every read reflects the latest committed store state.
#[derive(Clone)]
pub struct Aggregator {
    storage: Arc<dyn Storage>,
    threshold: Duration,
}

impl Aggregator {
    pub fn new(storage: Arc<dyn Storage>, threshold: Duration) -> Self {
        Self { storage, threshold }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// 某像素的真实打开数。
    /// 边界为闭区间：恰好等于宽限窗口的事件计入。未知像素返回 0。
    pub async fn count_genuine_opens(&self, pixel_id: &str) -> Result<u64> {
        let Some(pixel) = self.storage.get_pixel(pixel_id).await? else {
            return Ok(0);
        };
        let cutoff = pixel.created_at + self.threshold;
        self.storage.count_events_since(pixel_id, cutoff).await
    }

    /// 存在性检查，短路而非全量计数
    pub async fn has_genuine_open(&self, pixel_id: &str) -> Result<bool> {
        let Some(pixel) = self.storage.get_pixel(pixel_id).await? else {
            return Ok(false);
        };
        let cutoff = pixel.created_at + self.threshold;
        self.storage.has_event_since(pixel_id, cutoff).await
    }

    /// 某像素通过宽限窗口过滤的打开事件，按 opened_at 降序
    pub async fn genuine_events(&self, pixel_id: &str) -> Result<Vec<OpenEvent>> {
        let Some(pixel) = self.storage.get_pixel(pixel_id).await? else {
            return Ok(Vec::new());
        };
        let cutoff = pixel.created_at + self.threshold;
        self.storage.events_since(pixel_id, cutoff).await
    }

    /// 全局真实打开过的像素数（去重）。
    /// 每个事件必须相对它自己所属像素的 created_at 求值，绝不能用别的
    /// 像素的时间戳，所以这里走 event → pixel 的 join。
    pub async fn count_unique_opened_pixels(&self) -> Result<u64> {
        let rows = self.storage.open_events_with_pixel_created().await?;
        let unique: HashSet<String> = rows
            .into_iter()
            .filter(|row| row.opened_at - row.pixel_created_at >= self.threshold)
            .map(|row| row.pixel_id)
            .collect();
        Ok(unique.len() as u64)
    }

    /// 点击不做时间过滤
    pub async fn count_link_clicks(&self, link_id: &str) -> Result<u64> {
        self.storage.count_clicks(link_id).await
    }

    /// 真实打开像素占全部像素的百分比，一位小数
    pub async fn conversion_rate(&self) -> Result<f64> {
        Ok(self.dashboard().await?.conversion_rate)
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let total_pixels = self.storage.count_pixels().await?;
        let opened_pixels = self.count_unique_opened_pixels().await?;

        let conversion_rate = if total_pixels == 0 {
            0.0
        } else {
            round_to_one_decimal(opened_pixels as f64 / total_pixels as f64 * 100.0)
        };

        Ok(DashboardStats {
            total_pixels,
            opened_pixels,
            conversion_rate,
        })
    }

    /// 每个像素的真实打开数及其链接的点击数，像素按创建时间降序
    pub async fn pixel_overviews(&self) -> Result<Vec<PixelOverview>> {
        let pixels = self.storage.list_pixels().await?;
        let mut overviews = Vec::with_capacity(pixels.len());

        for pixel in pixels {
            let cutoff = pixel.created_at + self.threshold;
            let genuine_opens = self.storage.count_events_since(&pixel.id, cutoff).await?;

            let links = self.storage.links_for_pixel(&pixel.id).await?;
            let mut link_overviews = Vec::with_capacity(links.len());
            for link in links {
                let clicks = self.storage.count_clicks(&link.id).await?;
                link_overviews.push(LinkOverview { link, clicks });
            }

            overviews.push(PixelOverview {
                pixel,
                genuine_opens,
                links: link_overviews,
            });
        }

        Ok(overviews)
    }
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
