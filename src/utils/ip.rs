//! 客户端 IP 提取工具
//!
//! 跟踪信标总是部署在反向代理之后，因此只信任转发头：
//! 优先 X-Forwarded-For（取第一个，即原始客户端 IP），其次 X-Real-IP。

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// 提取客户端 IP，无法确定时返回 "unknown"
pub fn client_ip(req: &HttpRequest) -> String {
    extract_forwarded_ip_from_headers(req.headers()).unwrap_or_else(|| "unknown".to_string())
}

/// 提取 User-Agent，缺失时返回 "unknown"
pub fn user_agent(req: &HttpRequest) -> String {
    req.headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| "unknown".to_string())
}
