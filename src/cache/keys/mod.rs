/// 缓存键模块

pub mod tracking_keys;

pub use tracking_keys::{rate_limit_key, ups_track_key};
