use serde::{Deserialize, Serialize};
use serde_json::Value;

/// UPS 查询结果缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedTracking {
    pub tracking_number: String,
    pub tracking_data: Value,
    pub transaction_id: String,
    pub fetched_at: i64, // Unix timestamp
}
