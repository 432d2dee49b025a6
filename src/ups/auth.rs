//! UPS OAuth 访问令牌缓存
//!
//! 进程内只保存一个令牌。令牌过期（已扣除安全余量）后，第一个发现过期的请求
//! 发起 client-credentials 交换，同时到达的其他请求共享这一次交换的结果。

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::{Engine, engine::general_purpose::STANDARD};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{config::UpsConfig, error::UpsAuthError};

/// 令牌提前失效的安全余量（毫秒）
pub const SAFETY_MARGIN_MS: i64 = 60_000;

/// 毫秒级时间源
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// 缓存的访问令牌，整体替换，不做字段级修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    /// 已扣除安全余量的过期时间（Unix 毫秒）
    pub expires_at: i64,
}

impl CachedToken {
    pub fn is_fresh(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at
    }
}

#[derive(Clone)]
struct Credentials {
    client_id: String,
    client_secret: String,
    account_number: String,
}

type Exchange = Shared<BoxFuture<'static, Result<Arc<CachedToken>, UpsAuthError>>>;

#[derive(Default)]
struct TokenSlot {
    current: Option<Arc<CachedToken>>,
    in_flight: Option<(u64, Exchange)>,
    next_generation: u64,
}

pub struct UpsTokenCache {
    http: reqwest::Client,
    config: UpsConfig,
    clock: Arc<dyn Clock>,
    slot: Mutex<TokenSlot>,
}

impl UpsTokenCache {
    pub fn new(config: &UpsConfig, http: reqwest::Client) -> Self {
        Self::with_clock(config, http, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &UpsConfig, http: reqwest::Client, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            config: config.clone(),
            clock,
            slot: Mutex::new(TokenSlot::default()),
        }
    }

    /// 返回当前有效的访问令牌，必要时发起令牌交换
    pub async fn get_token(&self) -> Result<String, UpsAuthError> {
        let credentials = self.credentials()?;

        let (generation, exchange) = {
            let mut slot = self.lock_slot();
            let now = self.clock.now_millis();
            if let Some(token) = slot.current.as_ref().filter(|t| t.is_fresh(now)) {
                debug!("Using cached UPS access token");
                return Ok(token.access_token.clone());
            }

            match slot.in_flight.clone() {
                Some(in_flight) => {
                    debug!("Joining in-flight UPS token exchange");
                    in_flight
                }
                None => {
                    let generation = slot.next_generation;
                    slot.next_generation += 1;
                    // 交换过程中的 panic 转成错误，否则 Shared 会一直留在槽里
                    let exchange = AssertUnwindSafe(exchange_token(
                        self.http.clone(),
                        self.config.oauth_url.clone(),
                        credentials,
                        self.clock.clone(),
                    ))
                    .catch_unwind()
                    .map(|outcome| {
                        outcome.unwrap_or_else(|_| {
                            error!("UPS OAuth token exchange panicked");
                            Err(UpsAuthError::UpstreamAuth {
                                status: None,
                                body: "token exchange aborted".into(),
                            })
                        })
                    })
                    .boxed()
                    .shared();
                    slot.in_flight = Some((generation, exchange.clone()));
                    (generation, exchange)
                }
            }
        };

        let result = exchange.await;

        // 第一个拿到结果的等待者负责发布，失败时不动缓存
        {
            let mut slot = self.lock_slot();
            if slot
                .in_flight
                .as_ref()
                .is_some_and(|(current, _)| *current == generation)
            {
                slot.in_flight = None;
                if let Ok(token) = &result {
                    slot.current = Some(token.clone());
                }
            }
        }

        result.map(|token| token.access_token.clone())
    }

    /// 丢弃当前令牌，下一次调用会重新交换
    pub fn invalidate(&self) {
        let mut slot = self.lock_slot();
        if slot.current.take().is_some() {
            info!("UPS access token invalidated");
        }
    }

    pub fn cached_token(&self) -> Option<Arc<CachedToken>> {
        self.lock_slot().current.clone()
    }

    fn credentials(&self) -> Result<Credentials, UpsAuthError> {
        let config = &self.config;
        match (&config.client_id, &config.client_secret, &config.account_number) {
            (Some(client_id), Some(client_secret), Some(account_number)) => Ok(Credentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                account_number: account_number.clone(),
            }),
            _ => Err(UpsAuthError::Configuration(
                config.missing_credentials().join(", "),
            )),
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, TokenSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn exchange_token(
    http: reqwest::Client,
    oauth_url: String,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
) -> Result<Arc<CachedToken>, UpsAuthError> {
    info!("Fetching new UPS access token");

    let basic = STANDARD.encode(format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    ));
    let response = http
        .post(&oauth_url)
        .header("x-merchant-id", &credentials.account_number)
        .header(AUTHORIZATION, format!("Basic {}", basic))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| {
            error!("UPS OAuth token request could not complete: {}", e);
            UpsAuthError::UpstreamAuth {
                status: None,
                body: e.to_string(),
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("UPS OAuth token request failed ({}): {}", status, body);
        return Err(UpsAuthError::UpstreamAuth {
            status: Some(status.as_u16()),
            body,
        });
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| UpsAuthError::MalformedResponse(format!("invalid JSON body: {}", e)))?;
    let token = parse_token_response(&payload, clock.now_millis()).inspect_err(|e| {
        error!("Rejected UPS OAuth token response: {}", e);
    })?;

    info!(expires_at = token.expires_at, "Cached new UPS access token");
    Ok(Arc::new(token))
}

/// 解析令牌响应，`expires_in` 可以是数字或数字字符串
fn parse_token_response(payload: &Value, now_millis: i64) -> Result<CachedToken, UpsAuthError> {
    let access_token = payload
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| UpsAuthError::MalformedResponse("missing access_token".into()))?;

    let expires_in = match payload.get("expires_in") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| UpsAuthError::MalformedResponse("missing or non-numeric expires_in".into()))?;

    let lifetime_ms = expires_in
        .checked_mul(1000)
        .filter(|ms| *ms > SAFETY_MARGIN_MS)
        .ok_or_else(|| {
            UpsAuthError::MalformedResponse(format!(
                "expires_in {}s does not outlast the safety margin",
                expires_in
            ))
        })?;

    let expires_at = now_millis
        .checked_add(lifetime_ms - SAFETY_MARGIN_MS)
        .ok_or_else(|| {
            UpsAuthError::MalformedResponse(format!("expires_in {}s is out of range", expires_in))
        })?;

    Ok(CachedToken {
        access_token: access_token.to_string(),
        expires_at,
    })
}
