use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::auth::UpsTokenCache;
use crate::{config::UpsConfig, error::TrackingError};

const TRACK_QUERY: [(&str, &str); 4] = [
    ("locale", "en_US"),
    ("returnSignature", "false"),
    ("returnMilestones", "false"),
    ("returnPOD", "false"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResult {
    pub tracking_data: Value,
    pub transaction_id: String,
}

/// UPS 查询接口客户端
pub struct UpsTrackingClient {
    http: reqwest::Client,
    api_base_url: String,
    transaction_src: String,
    tokens: Arc<UpsTokenCache>,
}

impl UpsTrackingClient {
    pub fn new(config: &UpsConfig, http: reqwest::Client, tokens: Arc<UpsTokenCache>) -> Self {
        Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            transaction_src: config.transaction_src.clone(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<UpsTokenCache> {
        &self.tokens
    }

    pub async fn track(&self, tracking_number: &str) -> Result<TrackResult, TrackingError> {
        let transaction_id = Uuid::new_v4().to_string();
        let token = self.tokens.get_token().await?;

        let url = format!("{}/track/v1/details/{}", self.api_base_url, tracking_number);
        let response = self
            .http
            .get(&url)
            .query(&TRACK_QUERY)
            .header("transId", &transaction_id)
            .header("transactionSrc", &self.transaction_src)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| TrackingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                transaction_id = %transaction_id,
                "UPS Tracking API error ({}): {}",
                status,
                body
            );
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate();
            }
            return Err(TrackingError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let tracking_data = response
            .json::<Value>()
            .await
            .map_err(|e| TrackingError::Transport(format!("invalid tracking payload: {}", e)))?;

        Ok(TrackResult {
            tracking_data,
            transaction_id,
        })
    }
}

/// UPS 单号只允许字母和数字
pub fn is_valid_tracking_number(tracking_number: &str) -> bool {
    !tracking_number.is_empty()
        && tracking_number.len() <= 64
        && tracking_number.chars().all(|c| c.is_ascii_alphanumeric())
}
