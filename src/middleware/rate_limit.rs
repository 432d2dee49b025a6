use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use redis::AsyncCommands;

use crate::{
    cache::keys::rate_limit_key,
    config::Config,
    utils::{error_codes, error_to_api_response},
};

/// 基于 Redis 计数器的按 IP 限流
#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(redis: Arc<redis::Client>, config: Config) -> Self {
        Self {
            redis,
            config: Arc::new(config),
        }
    }

    /// 返回窗口内的请求计数
    async fn hit(&self, ip: &str) -> Result<i64, redis::RedisError> {
        let key = rate_limit_key(ip);
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let count: i64 = conn.incr(&key, 1).await?;
        if count == 1 {
            // 窗口内第一次请求，设置过期时间
            let _: () = conn
                .expire(&key, self.config.rate_limit_window().as_secs() as i64)
                .await?;
        }
        Ok(count)
    }

    pub async fn check_rate_limit(&self, req: Request<Body>, next: Next) -> Response {
        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());
        let ip = client_ip(req.headers(), remote_ip.as_deref());

        match self.hit(&ip).await {
            Ok(count) if count > self.config.rate_limit_requests as i64 => {
                tracing::info!(ip = %ip, count, "Rate limit exceeded");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    error_to_api_response::<()>(
                        error_codes::RATE_LIMIT,
                        format!(
                            "请求过于频繁，请在{}秒后重试",
                            self.config.rate_limit_window().as_secs()
                        ),
                    ),
                )
                    .into_response()
            }
            Ok(_) => next.run(req).await,
            Err(e) => {
                // Redis 不可用时放行
                tracing::warn!("Rate limiter unavailable: {}", e);
                next.run(req).await
            }
        }
    }
}

/// 优先取代理头中的客户端 IP，否则使用连接地址
fn client_ip(headers: &HeaderMap, remote_ip: Option<&str>) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip)
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn real_ip_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.7"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.8"));
        assert_eq!(client_ip(&headers, Some("127.0.0.1")), "10.0.0.7");
    }

    #[test]
    fn first_forwarded_address_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, None), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_connection_address() {
        assert_eq!(client_ip(&HeaderMap::new(), Some("::1")), "::1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }
}
