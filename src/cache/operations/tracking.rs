use std::sync::Arc;
use std::time::Duration;

use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::ups_track_key;
use crate::cache::models::CachedTracking;

/// UPS 查询结果缓存操作
pub struct TrackingCacheOperations;

impl TrackingCacheOperations {
    /// 缓存查询结果
    pub async fn cache_tracking(
        redis: &Arc<RedisClient>,
        tracking: &CachedTracking,
        ttl: Duration,
    ) -> Result<(), redis::RedisError> {
        if ttl.is_zero() {
            return Ok(());
        }
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let key = ups_track_key(&tracking.tracking_number);
        let json = serde_json::to_string(tracking).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;

        let _: () = conn.set_ex(key, json, ttl.as_secs()).await?;

        Ok(())
    }

    /// 获取查询结果缓存
    pub async fn get_cached_tracking(
        redis: &Arc<RedisClient>,
        tracking_number: &str,
    ) -> Result<Option<CachedTracking>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let key = ups_track_key(tracking_number);
        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let cached = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(cached))
            }
            None => Ok(None),
        }
    }
}
