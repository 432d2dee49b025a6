use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::{error_codes, error_to_api_response};

/// UPS 令牌获取失败
///
/// 需要 `Clone`：同一次进行中的令牌交换结果会分发给所有等待者。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpsAuthError {
    #[error("UPS credentials are not configured: {0}")]
    Configuration(String),

    #[error("UPS OAuth token request failed ({}): {body}", status_label(.status))]
    UpstreamAuth { status: Option<u16>, body: String },

    #[error("UPS OAuth token response is malformed: {0}")]
    MalformedResponse(String),
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| s.to_string())
}

/// UPS 查询接口失败
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error(transparent)]
    Token(#[from] UpsAuthError),

    #[error("UPS tracking API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("UPS tracking request failed: {0}")]
    Transport(String),
}

/// HTTP 边界错误
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("未授权访问")]
    Unauthorized,

    #[error("{0}")]
    AuthFailed(String),

    #[error("权限不足")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("查询服务暂时不可用")]
    TrackingUnavailable,

    #[error("UPS 查询失败: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("内部服务器错误")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", e);
        AppError::Internal(e.to_string())
    }
}

impl From<TrackingError> for AppError {
    fn from(e: TrackingError) -> Self {
        match e {
            TrackingError::Token(err) => {
                tracing::error!(error = %err, "Failed to obtain UPS access token");
                AppError::TrackingUnavailable
            }
            TrackingError::Transport(msg) => {
                tracing::error!("UPS tracking transport error: {}", msg);
                AppError::TrackingUnavailable
            }
            TrackingError::Upstream { status, body } => AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: body,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::AuthFailed(_) => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::Forbidden => (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::Conflict(_) => (StatusCode::CONFLICT, error_codes::USER_EXISTS),
            AppError::TrackingUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::TRACKING_UNAVAILABLE,
            ),
            AppError::Upstream { status, .. } => (*status, error_codes::UPSTREAM_ERROR),
            AppError::Internal(detail) => {
                tracing::debug!("Internal error detail: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        };

        (status, error_to_api_response::<()>(code, self.to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_collapse_to_service_unavailable() {
        let errors = [
            UpsAuthError::Configuration("UPS_CLIENT_ID".into()),
            UpsAuthError::UpstreamAuth {
                status: Some(401),
                body: "invalid_client".into(),
            },
            UpsAuthError::MalformedResponse("missing access_token".into()),
        ];
        for err in errors {
            let app: AppError = TrackingError::Token(err).into();
            assert_eq!(app.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[test]
    fn upstream_tracking_status_is_passed_through() {
        let app: AppError = TrackingError::Upstream {
            status: 404,
            body: "not found".into(),
        }
        .into();
        assert_eq!(app.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_auth_display_includes_status_and_body() {
        let err = UpsAuthError::UpstreamAuth {
            status: Some(401),
            body: "invalid_client".into(),
        };
        assert_eq!(
            err.to_string(),
            "UPS OAuth token request failed (401): invalid_client"
        );
    }
}
