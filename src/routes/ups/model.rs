use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CachedTracking;

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub tracking_number: String,
    /// 跳过缓存直接查询
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub tracking_number: String,
    pub tracking_data: Value,
    pub transaction_id: String,
    pub fetched_at: i64,
    pub cached: bool,
}

impl TrackResponse {
    pub fn fresh(tracking: CachedTracking) -> Self {
        Self::build(tracking, false)
    }

    pub fn from_cache(tracking: CachedTracking) -> Self {
        Self::build(tracking, true)
    }

    fn build(tracking: CachedTracking, cached: bool) -> Self {
        Self {
            tracking_number: tracking.tracking_number,
            tracking_data: tracking.tracking_data,
            transaction_id: tracking.transaction_id,
            fetched_at: tracking.fetched_at,
            cached,
        }
    }
}
