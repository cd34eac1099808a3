pub mod event;
pub mod link;
pub mod link_event;
pub mod pixel;
