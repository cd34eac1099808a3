//! Converters between SeaORM models and domain structs

use chrono::Utc;
use sea_orm::Set;
use uuid::Uuid;

use crate::storage::models::{OpenEvent, Pixel, TrackedLink};
use migration::entities::{event, link, link_event, pixel};

pub fn model_to_pixel(model: pixel::Model) -> Pixel {
    Pixel {
        id: model.id,
        email: model.email,
        created_at: model.created_at,
    }
}

pub fn model_to_link(model: link::Model) -> TrackedLink {
    TrackedLink {
        id: model.id,
        pixel_id: model.pixel_id,
        destination_url: model.destination_url,
        created_at: model.created_at,
    }
}

pub fn model_to_open_event(model: event::Model) -> OpenEvent {
    OpenEvent {
        id: model.id,
        pixel_id: model.pixel_id,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        opened_at: model.opened_at,
    }
}

/// 生成一个全新的像素 ActiveModel：id 与 created_at 由服务端指定
pub fn new_pixel_active_model(email: &str) -> (pixel::ActiveModel, Pixel) {
    let domain = Pixel {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        created_at: Utc::now(),
    };
    let active = pixel::ActiveModel {
        id: Set(domain.id.clone()),
        email: Set(domain.email.clone()),
        created_at: Set(domain.created_at),
    };
    (active, domain)
}

pub fn new_link_active_model(pixel_id: &str, destination_url: &str) -> (link::ActiveModel, TrackedLink) {
    let domain = TrackedLink {
        id: Uuid::new_v4().to_string(),
        pixel_id: pixel_id.to_string(),
        destination_url: destination_url.to_string(),
        created_at: Utc::now(),
    };
    let active = link::ActiveModel {
        id: Set(domain.id.clone()),
        pixel_id: Set(domain.pixel_id.clone()),
        destination_url: Set(domain.destination_url.clone()),
        created_at: Set(domain.created_at),
    };
    (active, domain)
}

pub fn new_event_active_model(
    pixel_id: &str,
    ip_address: &str,
    user_agent: &str,
) -> event::ActiveModel {
    event::ActiveModel {
        pixel_id: Set(pixel_id.to_string()),
        ip_address: Set(ip_address.to_string()),
        user_agent: Set(user_agent.to_string()),
        opened_at: Set(Utc::now()),
        ..Default::default()
    }
}

pub fn new_link_event_active_model(
    link_id: &str,
    ip_address: &str,
    user_agent: &str,
) -> link_event::ActiveModel {
    link_event::ActiveModel {
        link_id: Set(link_id.to_string()),
        ip_address: Set(ip_address.to_string()),
        user_agent: Set(user_agent.to_string()),
        clicked_at: Set(Utc::now()),
        ..Default::default()
    }
}
