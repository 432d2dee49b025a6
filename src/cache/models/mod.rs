/// 缓存数据模型

pub mod tracking;

pub use tracking::CachedTracking;
