//! Pixel issuance: create a tracking pixel (optionally with tracked
//! links) and fetch pixel metadata.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, Scope, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use url::Url;

use crate::errors::{Result, TrackerError};
use crate::services::stats::StatsService;
use crate::services::tracker::{tracker_url, tracking_link_url};
use crate::storage::{Pixel, Storage, TrackedLink};

#[derive(Debug, Deserialize)]
pub struct CreatePixelRequest {
    pub email: String,
    #[serde(default)]
    pub links: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct TrackingLinkResponse {
    pub id: String,
    pub destination_url: String,
    pub tracking_url: String,
}

#[derive(Debug, Serialize)]
pub struct PixelResponse {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub tracker_url: String,
    /// 链接批量插入失败时省略，像素本身仍然可用
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_links: Option<Vec<TrackingLinkResponse>>,
}

/// 一次签发的结果。像素创建是主效果，链接创建是次要效果：
/// 链接失败不回滚像素，只在这里标记出来。
#[derive(Debug)]
pub struct PixelIssue {
    pub pixel: Pixel,
    pub links: Vec<TrackedLink>,
    pub links_failed: bool,
}

/// 过滤目标 URL：前后空白剔除，空串和语法非法的条目静默丢弃
fn sanitize_destination_urls(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .filter(|u| Url::parse(u).is_ok())
        .map(String::from)
        .collect()
}

/// 签发一个像素及其可选的跟踪链接
pub async fn issue_pixel(
    storage: &dyn Storage,
    email: &str,
    destination_urls: &[String],
) -> Result<PixelIssue> {
    let email = email.trim();
    if email.is_empty() {
        return Err(TrackerError::validation("Email is required"));
    }

    let urls = sanitize_destination_urls(destination_urls);

    let pixel = storage.insert_pixel(email).await?;

    let (links, links_failed) = if urls.is_empty() {
        (Vec::new(), false)
    } else {
        match storage.insert_links(&pixel.id, &urls).await {
            Ok(links) => (links, false),
            Err(e) => {
                warn!("Pixel {} created but link insertion failed: {}", pixel.id, e);
                (Vec::new(), true)
            }
        }
    };

    Ok(PixelIssue {
        pixel,
        links,
        links_failed,
    })
}

fn link_response(link: &TrackedLink) -> TrackingLinkResponse {
    TrackingLinkResponse {
        id: link.id.clone(),
        destination_url: link.destination_url.clone(),
        tracking_url: tracking_link_url(&link.id),
    }
}

fn pixel_response(pixel: &Pixel, tracking_links: Option<Vec<TrackingLinkResponse>>) -> PixelResponse {
    PixelResponse {
        id: pixel.id.clone(),
        email: pixel.email.clone(),
        created_at: pixel.created_at,
        tracker_url: tracker_url(&pixel.id),
        tracking_links,
    }
}

pub struct PixelService;

impl PixelService {
    /// POST /api/pixels/create
    pub async fn create_pixel(
        body: web::Json<CreatePixelRequest>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let request = body.into_inner();
        let urls = request.links.unwrap_or_default();

        match issue_pixel(storage.get_ref().as_ref(), &request.email, &urls).await {
            Ok(issue) => {
                info!(
                    "Issued pixel {} with {} links",
                    issue.pixel.id,
                    issue.links.len()
                );
                let tracking_links = if issue.links_failed {
                    None
                } else {
                    Some(issue.links.iter().map(link_response).collect())
                };
                HttpResponse::Ok().json(pixel_response(&issue.pixel, tracking_links))
            }
            Err(TrackerError::Validation(msg)) => {
                HttpResponse::BadRequest().json(json!({ "error": msg }))
            }
            Err(e) => {
                error!("Failed to create pixel: {}", e);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to create pixel" }))
            }
        }
    }

    /// GET /api/pixels/{id}
    pub async fn get_pixel(
        id: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let pixel_id = id.into_inner();
        if pixel_id.trim().is_empty() {
            return HttpResponse::BadRequest().json(json!({ "error": "Pixel ID is required" }));
        }

        match storage.get_pixel(&pixel_id).await {
            Ok(Some(pixel)) => HttpResponse::Ok().json(pixel_response(&pixel, None)),
            Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Pixel not found" })),
            Err(e) => {
                error!("Failed to fetch pixel {}: {}", pixel_id, e);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to fetch pixel" }))
            }
        }
    }
}

/// 像素资源路由。"/{id}" 必须最后注册，否则会吞掉更具体的路径。
pub fn pixel_routes() -> Scope {
    web::scope("/api/pixels")
        .route("", web::get().to(StatsService::list_pixels))
        .route("/create", web::post().to(PixelService::create_pixel))
        .route("/{id}/events", web::get().to(StatsService::pixel_events))
        .route("/{id}", web::get().to(PixelService::get_pixel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_destination_urls() {
        let raw = vec![
            "https://example.com".to_string(),
            "".to_string(),
            "   ".to_string(),
            "  https://rust-lang.org/  ".to_string(),
            "not a url".to_string(),
        ];
        let urls = sanitize_destination_urls(&raw);
        assert_eq!(
            urls,
            vec![
                "https://example.com".to_string(),
                "https://rust-lang.org/".to_string()
            ]
        );
    }

    #[test]
    fn test_sanitize_empty_input() {
        assert!(sanitize_destination_urls(&[]).is_empty());
    }
}
