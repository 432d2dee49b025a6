use axum::{
    Json,
    extract::{Extension, State},
};

use crate::{
    AppState,
    error::AppError,
    utils::{
        ApiResponse, Claims, generate_token, hash_password, success_to_api_response,
        verify_password,
    },
};

use super::model::{
    LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse, User,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, AppError> {
    let req = req.normalized();
    req.validate()?;

    let password_hash =
        hash_password(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = User::register(&state.pool, &req, password_hash).await?;

    // 注册成功后直接签发令牌
    let (token, expires_at) = generate_token(&user.user_id, user.is_admin, &state.config)
        .map_err(|e| AppError::Internal(format!("生成令牌失败: {}", e)))?;

    Ok(success_to_api_response(RegisterResponse {
        user,
        token,
        expires_at,
    }))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("请输入邮箱和密码".into()));
    }

    let Some(user) = User::find_by_email(&state.pool, &email).await? else {
        return Err(AppError::AuthFailed("邮箱或密码错误".into()));
    };

    let matched = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !matched {
        tracing::info!("Failed login attempt for user: {}", user.user_id);
        return Err(AppError::AuthFailed("邮箱或密码错误".into()));
    }

    let (token, expires_at) = generate_token(&user.user_id, user.is_admin, &state.config)
        .map_err(|e| AppError::Internal(format!("生成令牌失败: {}", e)))?;

    Ok(success_to_api_response(LoginResponse {
        user_id: user.user_id,
        name: user.name,
        is_admin: user.is_admin,
        token,
        expires_at,
    }))
}

/// 返回当前令牌对应的用户，中间件已完成校验
#[axum::debug_handler]
pub async fn me(Extension(claims): Extension<Claims>) -> Json<ApiResponse<MeResponse>> {
    success_to_api_response(MeResponse {
        user_id: claims.sub,
        is_admin: claims.is_admin,
    })
}
