// UPS 接入
// auth: OAuth 令牌缓存; track: 查询接口

pub mod auth;
pub mod track;

pub use auth::{CachedToken, Clock, SystemClock, UpsTokenCache};
pub use track::{TrackResult, UpsTrackingClient, is_valid_tracking_number};

use std::sync::Arc;

use crate::config::UpsConfig;

/// 令牌交换和查询共用的 HTTP 客户端，带请求超时
pub fn http_client(config: &UpsConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
}

/// 构建令牌缓存和查询客户端，进程启动时调用一次
pub fn build_tracking_client(config: &UpsConfig) -> reqwest::Result<UpsTrackingClient> {
    let http = http_client(config)?;
    let tokens = Arc::new(UpsTokenCache::new(config, http.clone()));
    Ok(UpsTrackingClient::new(config, http, tokens))
}
