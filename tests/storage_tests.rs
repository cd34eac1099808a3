//! SeaORM storage backend tests against a throwaway SQLite database.

mod common;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use mailtrack::storage::backend::SeaOrmStorage;

use common::init_test_config;

async fn sqlite_storage() -> (SeaOrmStorage, TempDir) {
    init_test_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

#[tokio::test]
async fn test_pixel_roundtrip() {
    let (storage, _dir) = sqlite_storage().await;
    assert_eq!(storage.backend_name(), "sqlite");

    let created = storage.insert_pixel("a@example.com").await.unwrap();
    assert_eq!(created.email, "a@example.com");

    let fetched = storage.get_pixel(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.email, created.email);
    // 存储层时间戳精度可能低于内存值，只验证秒级一致
    assert!((fetched.created_at - created.created_at).num_seconds().abs() < 1);

    assert!(storage.get_pixel("missing").await.unwrap().is_none());
    assert_eq!(storage.count_pixels().await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_pixels_newest_first() {
    let (storage, _dir) = sqlite_storage().await;

    let first = storage.insert_pixel("first@example.com").await.unwrap();
    let second = storage.insert_pixel("second@example.com").await.unwrap();

    let pixels = storage.list_pixels().await.unwrap();
    assert_eq!(pixels.len(), 2);
    // 相同时间戳下顺序不保证，只验证两条都在且降序
    assert!(pixels[0].created_at >= pixels[1].created_at);
    let ids: Vec<&str> = pixels.iter().map(|p| p.id.as_str()).collect();
    assert!(ids.contains(&first.id.as_str()));
    assert!(ids.contains(&second.id.as_str()));
}

#[tokio::test]
async fn test_links_batch_insert_and_lookup() {
    let (storage, _dir) = sqlite_storage().await;

    let pixel = storage.insert_pixel("a@example.com").await.unwrap();
    let urls = vec![
        "https://one.example.com".to_string(),
        "https://two.example.com".to_string(),
    ];
    let links = storage.insert_links(&pixel.id, &urls).await.unwrap();
    assert_eq!(links.len(), 2);

    let fetched = storage.get_link(&links[0].id).await.unwrap().unwrap();
    assert_eq!(fetched.destination_url, "https://one.example.com");
    assert_eq!(fetched.pixel_id, pixel.id);

    let listed = storage.links_for_pixel(&pixel.id).await.unwrap();
    assert_eq!(listed.len(), 2);

    let empty = storage.insert_links(&pixel.id, &[]).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_open_events_and_cutoff_queries() {
    let (storage, _dir) = sqlite_storage().await;

    let pixel = storage.insert_pixel("a@example.com").await.unwrap();
    storage
        .insert_open_event(&pixel.id, "203.0.113.7", "Thunderbird/115")
        .await
        .unwrap();
    storage
        .insert_open_event(&pixel.id, "203.0.113.8", "Gmail proxy")
        .await
        .unwrap();

    let past = Utc::now() - Duration::hours(1);
    let future = Utc::now() + Duration::hours(1);

    assert_eq!(storage.count_events_since(&pixel.id, past).await.unwrap(), 2);
    assert!(storage.has_event_since(&pixel.id, past).await.unwrap());
    assert_eq!(
        storage.count_events_since(&pixel.id, future).await.unwrap(),
        0
    );
    assert!(!storage.has_event_since(&pixel.id, future).await.unwrap());

    let events = storage.events_since(&pixel.id, past).await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[0].opened_at >= events[1].opened_at);
}

#[tokio::test]
async fn test_click_events_counted_per_link() {
    let (storage, _dir) = sqlite_storage().await;

    let pixel = storage.insert_pixel("a@example.com").await.unwrap();
    let links = storage
        .insert_links(
            &pixel.id,
            &[
                "https://one.example.com".to_string(),
                "https://two.example.com".to_string(),
            ],
        )
        .await
        .unwrap();

    storage
        .insert_click_event(&links[0].id, "10.0.0.1", "ua")
        .await
        .unwrap();
    storage
        .insert_click_event(&links[0].id, "10.0.0.2", "ua")
        .await
        .unwrap();

    assert_eq!(storage.count_clicks(&links[0].id).await.unwrap(), 2);
    assert_eq!(storage.count_clicks(&links[1].id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_open_join_carries_pixel_created_at() {
    let (storage, _dir) = sqlite_storage().await;

    let p1 = storage.insert_pixel("a@example.com").await.unwrap();
    let p2 = storage.insert_pixel("b@example.com").await.unwrap();
    storage
        .insert_open_event(&p1.id, "10.0.0.1", "ua")
        .await
        .unwrap();
    storage
        .insert_open_event(&p2.id, "10.0.0.2", "ua")
        .await
        .unwrap();

    let rows = storage.open_events_with_pixel_created().await.unwrap();
    assert_eq!(rows.len(), 2);

    let row1 = rows.iter().find(|r| r.pixel_id == p1.id).unwrap();
    assert!((row1.pixel_created_at - p1.created_at).num_seconds().abs() < 1);
    let row2 = rows.iter().find(|r| r.pixel_id == p2.id).unwrap();
    assert!((row2.pixel_created_at - p2.created_at).num_seconds().abs() < 1);
}
