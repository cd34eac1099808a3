use actix_web::{App, HttpServer, web};
use chrono::Duration;
use dotenvy::dotenv;
use tracing::info;

use mailtrack::analytics::Aggregator;
use mailtrack::config::{get_config, init_config};
use mailtrack::services::{pixel_routes, stats_routes, tracker_routes};
use mailtrack::storage::StorageFactory;
use mailtrack::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    init_config();
    let config = get_config();

    // guard 必须活到进程结束，否则日志线程被提前回收
    let _log_guard = init_logging(config);

    let storage = StorageFactory::create()
        .await
        .expect("Failed to create storage");

    let aggregator = Aggregator::new(
        storage.clone(),
        Duration::seconds(config.tracking.genuine_open_threshold_secs),
    );

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(aggregator.clone()))
            .service(stats_routes())
            .service(pixel_routes())
            .service(tracker_routes())
    })
    .bind(bind_address)?
    .run()
    .await
}
