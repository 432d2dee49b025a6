/// 缓存操作

pub mod tracking;

pub use tracking::TrackingCacheOperations;
