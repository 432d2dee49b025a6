use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppError,
    ups::is_valid_tracking_number,
    utils::{ApiResponse, Claims, success_to_api_response},
};

use super::model::{
    CreateTrackingRequest, DeleteTrackingsRequest, DeleteTrackingsResponse, TrackingEntry,
};

#[axum::debug_handler]
pub async fn list(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TrackingEntry>>>, AppError> {
    let entries = TrackingEntry::list_for_user(&state.pool, &claims.sub).await?;
    Ok(success_to_api_response(entries))
}

#[axum::debug_handler]
pub async fn create(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateTrackingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TrackingEntry>>), AppError> {
    let name = req.name.trim();
    let tracking_number = req.tracking_number.trim().to_ascii_uppercase();
    if name.is_empty() || tracking_number.is_empty() {
        return Err(AppError::Validation("名称和单号不能为空".into()));
    }
    if !is_valid_tracking_number(&tracking_number) {
        return Err(AppError::Validation("单号格式无效，只允许字母和数字".into()));
    }

    let entry = TrackingEntry::create(&state.pool, &claims.sub, name, &tracking_number).await?;
    tracing::debug!("Created tracking entry {} for {}", entry.id, claims.sub);

    Ok((StatusCode::CREATED, success_to_api_response(entry)))
}

#[axum::debug_handler]
pub async fn delete(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<DeleteTrackingsRequest>,
) -> Result<Json<ApiResponse<DeleteTrackingsResponse>>, AppError> {
    if req.ids.is_empty() {
        return Err(AppError::Validation("未提供要删除的记录".into()));
    }

    let deleted = TrackingEntry::delete_for_user(&state.pool, &claims.sub, &req.ids).await?;

    Ok(success_to_api_response(DeleteTrackingsResponse { deleted }))
}
