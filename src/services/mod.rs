pub mod pixel;
pub mod stats;
pub mod tracker;

pub use pixel::{PixelService, pixel_routes};
pub use stats::{StatsService, stats_routes};
pub use tracker::{TrackerService, tracker_routes};
