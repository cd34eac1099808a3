//! Ingestion handlers: the tracking beacon and the tracked link redirect.
//!
//! Both endpoints prioritize the user-visible effect over durability of
//! the tracking side effect: the recipient must never see a broken image
//! or a dead link, so storage failures are logged and swallowed. Tracking
//! loss is acceptable; broken email rendering is not.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Responder, Scope, web};
use tracing::{debug, error};

use crate::config::get_config;
use crate::storage::Storage;
use crate::utils::ip::{client_ip, user_agent};
use crate::utils::pixel::TRANSPARENT_PNG;

/// 像素信标地址
pub fn tracker_url(pixel_id: &str) -> String {
    format!("/tracker/{}.png", pixel_id)
}

/// 跟踪链接地址
pub fn tracking_link_url(link_id: &str) -> String {
    format!("/tracker/link/{}", link_id)
}

pub struct TrackerService;

impl TrackerService {
    /// GET /tracker/{path} — 记录一次打开，永远返回 200 + 透明像素
    pub async fn handle_open(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let captured_path = path.into_inner();
        let pixel_id = captured_path
            .strip_suffix(".png")
            .unwrap_or(&captured_path);

        // 退化的信标请求（如裸 /tracker/）：不写库，只回像素
        if pixel_id.is_empty() {
            debug!("Beacon request without pixel id");
            return Self::beacon_response();
        }

        let ip_address = client_ip(&req);
        let ua = user_agent(&req);

        if let Err(e) = storage.insert_open_event(pixel_id, &ip_address, &ua).await {
            // 写入失败绝不能影响信标响应
            error!("Failed to record open for pixel {}: {}", pixel_id, e);
        }

        Self::beacon_response()
    }

    /// GET /tracker/link/{id} — 记录一次点击并 302 到目标地址。
    /// 未知链接或查询失败时 302 到首页，绝不向收件人暴露错误。
    pub async fn handle_click(
        req: HttpRequest,
        id: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let link_id = id.into_inner();

        if link_id.is_empty() {
            return Self::redirect_home();
        }

        let link = match storage.get_link(&link_id).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                debug!("Click on unknown link: {}", link_id);
                return Self::redirect_home();
            }
            Err(e) => {
                error!("Link lookup failed for {}: {}", link_id, e);
                return Self::redirect_home();
            }
        };

        let ip_address = client_ip(&req);
        let ua = user_agent(&req);

        if let Err(e) = storage.insert_click_event(&link_id, &ip_address, &ua).await {
            // 点击记录失败不阻塞跳转
            error!("Failed to record click for link {}: {}", link_id, e);
        }

        HttpResponse::Found()
            .insert_header(("Location", link.destination_url))
            .finish()
    }

    fn beacon_response() -> HttpResponse {
        HttpResponse::Ok()
            .insert_header(("Content-Type", "image/png"))
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .body(&TRANSPARENT_PNG[..])
    }

    fn redirect_home() -> HttpResponse {
        let home_url = get_config().tracking.home_url.clone();
        HttpResponse::Found()
            .insert_header(("Location", home_url))
            .finish()
    }
}

/// Tracker 路由配置。link 路由必须先于 catch-all 注册。
pub fn tracker_routes() -> Scope {
    web::scope("/tracker")
        .route("/link/{id}", web::get().to(TrackerService::handle_click))
        .route("/{path:.*}", web::get().to(TrackerService::handle_open))
}
