//! Reporting endpoints backed by the analytics aggregator.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, Scope, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::analytics::{Aggregator, PixelOverview};
use crate::services::tracker::{tracker_url, tracking_link_url};
use crate::storage::{OpenEvent, Storage};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_pixels: u64,
    pub opened_pixels: u64,
    /// 百分比，固定一位小数（如 "33.3"；没有像素时为 "0.0"）
    pub conversion_rate: String,
}

#[derive(Debug, Serialize)]
pub struct LinkOverviewResponse {
    pub id: String,
    pub destination_url: String,
    pub tracking_url: String,
    pub clicks: u64,
}

#[derive(Debug, Serialize)]
pub struct PixelOverviewResponse {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub tracker_url: String,
    pub genuine_opens: u64,
    pub links: Vec<LinkOverviewResponse>,
}

#[derive(Debug, Serialize)]
pub struct OpenEventResponse {
    pub id: i64,
    pub ip_address: String,
    pub user_agent: String,
    pub opened_at: DateTime<Utc>,
}

fn overview_response(overview: PixelOverview) -> PixelOverviewResponse {
    let links = overview
        .links
        .into_iter()
        .map(|lo| LinkOverviewResponse {
            tracking_url: tracking_link_url(&lo.link.id),
            id: lo.link.id,
            destination_url: lo.link.destination_url,
            clicks: lo.clicks,
        })
        .collect();

    PixelOverviewResponse {
        tracker_url: tracker_url(&overview.pixel.id),
        id: overview.pixel.id,
        email: overview.pixel.email,
        created_at: overview.pixel.created_at,
        genuine_opens: overview.genuine_opens,
        links,
    }
}

fn event_response(event: OpenEvent) -> OpenEventResponse {
    OpenEventResponse {
        id: event.id,
        ip_address: event.ip_address,
        user_agent: event.user_agent,
        opened_at: event.opened_at,
    }
}

pub struct StatsService;

impl StatsService {
    /// GET /api/stats — 仪表盘汇总
    pub async fn dashboard(aggregator: web::Data<Aggregator>) -> impl Responder {
        match aggregator.dashboard().await {
            Ok(stats) => HttpResponse::Ok().json(DashboardResponse {
                total_pixels: stats.total_pixels,
                opened_pixels: stats.opened_pixels,
                conversion_rate: format!("{:.1}", stats.conversion_rate),
            }),
            Err(e) => {
                error!("Failed to compute dashboard stats: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Failed to load stats" }))
            }
        }
    }

    /// GET /api/pixels — 所有像素及其真实打开数和链接点击数
    pub async fn list_pixels(aggregator: web::Data<Aggregator>) -> impl Responder {
        match aggregator.pixel_overviews().await {
            Ok(overviews) => {
                let body: Vec<PixelOverviewResponse> =
                    overviews.into_iter().map(overview_response).collect();
                HttpResponse::Ok().json(body)
            }
            Err(e) => {
                error!("Failed to list pixel overviews: {}", e);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to load pixels" }))
            }
        }
    }

    /// GET /api/pixels/{id}/events — 某像素通过宽限窗口过滤的打开事件
    pub async fn pixel_events(
        id: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
        aggregator: web::Data<Aggregator>,
    ) -> impl Responder {
        let pixel_id = id.into_inner();

        let pixel = match storage.get_pixel(&pixel_id).await {
            Ok(Some(pixel)) => pixel,
            Ok(None) => {
                return HttpResponse::NotFound().json(json!({ "error": "Pixel not found" }));
            }
            Err(e) => {
                error!("Failed to fetch pixel {}: {}", pixel_id, e);
                return HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to load events" }));
            }
        };

        match aggregator.genuine_events(&pixel_id).await {
            Ok(events) => {
                let events: Vec<OpenEventResponse> =
                    events.into_iter().map(event_response).collect();
                HttpResponse::Ok().json(json!({
                    "pixel": {
                        "id": pixel.id,
                        "email": pixel.email,
                        "created_at": pixel.created_at,
                    },
                    "count": events.len(),
                    "events": events,
                }))
            }
            Err(e) => {
                error!("Failed to load events for pixel {}: {}", pixel_id, e);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to load events" }))
            }
        }
    }
}

/// 仪表盘路由。像素列表和事件查询挂在 pixel_routes 的 scope 下，
/// 避免和 /api/pixels 前缀重叠（actix 的 scope 不回溯）。
pub fn stats_routes() -> Scope {
    web::scope("/api/stats").route("", web::get().to(StatsService::dashboard))
}
