use std::env;
use std::time::Duration;

const DEFAULT_UPS_OAUTH_URL: &str = "https://wwwcie.ups.com/security/v1/oauth/token";
const DEFAULT_UPS_API_BASE_URL: &str = "https://onlinetools.ups.com/api";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub ups: UpsConfig,
}

/// UPS 接口配置
///
/// 三个凭据在加载时允许缺失，启动时由 [`UpsConfig::missing_credentials`] 检查，
/// 取令牌时会再次检查。
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub account_number: Option<String>,
    pub oauth_url: String,
    pub api_base_url: String,
    pub transaction_src: String,
    pub request_timeout_secs: u64,
    pub tracking_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.trim_end_matches('h').parse::<u64>().ok())
            .unwrap_or(24);
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: parse_or("SERVER_PORT", 3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW", 60),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", 100),
            ups: UpsConfig::from_env(),
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl UpsConfig {
    pub fn from_env() -> Self {
        UpsConfig {
            client_id: non_empty("UPS_CLIENT_ID"),
            client_secret: non_empty("UPS_CLIENT_SECRET"),
            account_number: non_empty("UPS_ACCOUNT_NUMBER"),
            oauth_url: env::var("UPS_OAUTH_URL").unwrap_or_else(|_| DEFAULT_UPS_OAUTH_URL.into()),
            api_base_url: env::var("UPS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPS_API_BASE_URL.into()),
            transaction_src: env::var("UPS_TRANSACTION_SRC")
                .unwrap_or_else(|_| "parcel-tracker".into()),
            request_timeout_secs: positive_or(env::var("UPS_REQUEST_TIMEOUT").ok(), 10),
            tracking_cache_ttl_secs: parse_or("UPS_TRACKING_CACHE_TTL", 300),
        }
    }

    /// 返回缺失的凭据环境变量名
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_none() {
            missing.push("UPS_CLIENT_ID");
        }
        if self.client_secret.is_none() {
            missing.push("UPS_CLIENT_SECRET");
        }
        if self.account_number.is_none() {
            missing.push("UPS_ACCOUNT_NUMBER");
        }
        missing
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tracking_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tracking_cache_ttl_secs)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 0 或无法解析时使用默认值
fn positive_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
