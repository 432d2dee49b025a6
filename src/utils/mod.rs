use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // 用户ID
    pub exp: i64,       // 过期时间
    pub iat: i64,       // 签发时间
    pub is_admin: bool, // 管理员标识
}

pub fn generate_token(
    user_id: &str,
    is_admin: bool,
    config: &Config,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiration = (now + Duration::seconds(config.jwt_expiration().as_secs() as i64)).timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
        iat: now.timestamp(),
        is_admin,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok((token, expiration))
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

// 统一响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const RATE_LIMIT: i32 = 1005;
    pub const UPSTREAM_ERROR: i32 = 2001;
    pub const TRACKING_UNAVAILABLE: i32 = 2002;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{Config, UpsConfig};

    pub fn config_with_ups(ups: UpsConfig) -> Config {
        Config {
            database_url: "postgres://localhost/parcel_tracker".into(),
            redis_url: "redis://127.0.0.1:1".into(),
            jwt_secret: "test-secret".into(),
            jwt_expiration_secs: 3600,
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            server_host: "127.0.0.1".into(),
            server_port: 3000,
            api_base_uri: "/api".into(),
            ups,
        }
    }

    pub fn ups_config(base_url: &str) -> UpsConfig {
        UpsConfig {
            client_id: Some("client-id".into()),
            client_secret: Some("client-secret".into()),
            account_number: Some("A1B2C3".into()),
            oauth_url: format!("{}/security/v1/oauth/token", base_url),
            api_base_url: format!("{}/api", base_url),
            transaction_src: "parcel-tracker".into(),
            request_timeout_secs: 5,
            tracking_cache_ttl_secs: 300,
        }
    }

    pub fn config() -> Config {
        config_with_ups(ups_config("http://127.0.0.1:1"))
    }
}
