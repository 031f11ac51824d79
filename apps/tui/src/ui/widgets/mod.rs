pub mod analytics;
pub mod map;
pub mod periods;
pub mod popup;
pub mod tables;
pub mod timeline;
