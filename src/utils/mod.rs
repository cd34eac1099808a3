pub mod ip;
pub mod pixel;

pub use ip::client_ip;
pub use pixel::TRANSPARENT_PNG;
