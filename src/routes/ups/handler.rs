use axum::{Json, extract::State};

use crate::{
    AppState,
    cache::{CachedTracking, TrackingCacheOperations},
    error::AppError,
    ups::is_valid_tracking_number,
    utils::{ApiResponse, success_to_api_response},
};

use super::model::{TrackRequest, TrackResponse};

/// 查询 UPS 物流详情，优先读 Redis 缓存
#[axum::debug_handler]
pub async fn track(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<ApiResponse<TrackResponse>>, AppError> {
    let tracking_number = req.tracking_number.trim().to_ascii_uppercase();
    if tracking_number.is_empty() {
        return Err(AppError::Validation("请提供单号".into()));
    }
    if !is_valid_tracking_number(&tracking_number) {
        return Err(AppError::Validation("单号格式无效，只允许字母和数字".into()));
    }

    if !req.refresh {
        match TrackingCacheOperations::get_cached_tracking(&state.redis, &tracking_number).await {
            Ok(Some(cached)) => {
                tracing::debug!("Tracking cache hit for {}", tracking_number);
                return Ok(success_to_api_response(TrackResponse::from_cache(cached)));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Tracking cache read failed: {}", e),
        }
    }

    let result = state.ups.track(&tracking_number).await?;

    let cached = CachedTracking {
        tracking_number,
        tracking_data: result.tracking_data,
        transaction_id: result.transaction_id,
        fetched_at: chrono::Utc::now().timestamp(),
    };
    if let Err(e) = TrackingCacheOperations::cache_tracking(
        &state.redis,
        &cached,
        state.config.ups.tracking_cache_ttl(),
    )
    .await
    {
        tracing::warn!("Tracking cache write failed: {}", e);
    }

    Ok(success_to_api_response(TrackResponse::fresh(cached)))
}
