use axum::{
    Json,
    extract::{Extension, State},
};

use crate::{
    AppState,
    error::AppError,
    utils::{ApiResponse, Claims, success_to_api_response},
};

use super::model::{GenerateInviteResponse, InviteCode};

/// 生成邀请码，仅管理员可用
#[axum::debug_handler]
pub async fn generate(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GenerateInviteResponse>>, AppError> {
    if !claims.is_admin {
        return Err(AppError::Forbidden);
    }
    // 令牌里的标记可能已过时，以数据库为准
    if !InviteCode::issuer_is_admin(&state.pool, &claims.sub).await? {
        tracing::info!("Admin flag revoked for {}", claims.sub);
        return Err(AppError::Forbidden);
    }

    let invite = InviteCode::create(&state.pool, &claims.sub).await?;
    tracing::info!("Invite code generated by {}", claims.sub);

    Ok(success_to_api_response(GenerateInviteResponse { code: invite.code }))
}
