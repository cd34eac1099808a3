//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};

use super::SeaOrmStorage;
use super::converters::{model_to_link, model_to_open_event, model_to_pixel};
use crate::errors::Result;
use crate::storage::models::{OpenEvent, OpenedPixelRow, Pixel, TrackedLink};

use migration::entities::{event, link, link_event, pixel};

/// event → pixel join 行（DSL 聚合查询）
#[derive(Debug, FromQueryResult)]
struct OpenJoinRow {
    pixel_id: String,
    opened_at: DateTime<Utc>,
    pixel_created_at: DateTime<Utc>,
}

impl SeaOrmStorage {
    pub async fn get_pixel(&self, id: &str) -> Result<Option<Pixel>> {
        let model = pixel::Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(model.map(model_to_pixel))
    }

    pub async fn list_pixels(&self) -> Result<Vec<Pixel>> {
        let models = pixel::Entity::find()
            .order_by_desc(pixel::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_pixel).collect())
    }

    pub async fn count_pixels(&self) -> Result<u64> {
        Ok(pixel::Entity::find().count(&self.db).await?)
    }

    pub async fn get_link(&self, id: &str) -> Result<Option<TrackedLink>> {
        let model = link::Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(model.map(model_to_link))
    }

    pub async fn links_for_pixel(&self, pixel_id: &str) -> Result<Vec<TrackedLink>> {
        let models = link::Entity::find()
            .filter(link::Column::PixelId.eq(pixel_id))
            .order_by_asc(link::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn events_since(
        &self,
        pixel_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<OpenEvent>> {
        let models = event::Entity::find()
            .filter(event::Column::PixelId.eq(pixel_id))
            .filter(event::Column::OpenedAt.gte(cutoff))
            .order_by_desc(event::Column::OpenedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_open_event).collect())
    }

    pub async fn count_events_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<u64> {
        Ok(event::Entity::find()
            .filter(event::Column::PixelId.eq(pixel_id))
            .filter(event::Column::OpenedAt.gte(cutoff))
            .count(&self.db)
            .await?)
    }

    pub async fn has_event_since(&self, pixel_id: &str, cutoff: DateTime<Utc>) -> Result<bool> {
        // one() 自带 LIMIT 1，存在性检查无需全量 COUNT
        let first = event::Entity::find()
            .filter(event::Column::PixelId.eq(pixel_id))
            .filter(event::Column::OpenedAt.gte(cutoff))
            .one(&self.db)
            .await?;
        Ok(first.is_some())
    }

    pub async fn count_clicks(&self, link_id: &str) -> Result<u64> {
        Ok(link_event::Entity::find()
            .filter(link_event::Column::LinkId.eq(link_id))
            .count(&self.db)
            .await?)
    }

    pub async fn open_events_with_pixel_created(&self) -> Result<Vec<OpenedPixelRow>> {
        let rows = event::Entity::find()
            .select_only()
            .column(event::Column::PixelId)
            .column(event::Column::OpenedAt)
            .column_as(pixel::Column::CreatedAt, "pixel_created_at")
            .join(JoinType::InnerJoin, event::Relation::Pixel.def())
            .into_model::<OpenJoinRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| OpenedPixelRow {
                pixel_id: row.pixel_id,
                opened_at: row.opened_at,
                pixel_created_at: row.pixel_created_at,
            })
            .collect())
    }
}
