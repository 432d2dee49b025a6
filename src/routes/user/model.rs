use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;

const USER_COLUMNS: &str = "user_id, email, name, password_hash, is_admin, created_at";

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub invite_code: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub name: String,
    pub is_admin: bool,
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub is_admin: bool,
}

impl RegisterRequest {
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password,
            name: self.name.trim().to_string(),
            invite_code: self.invite_code.trim().to_string(),
        }
    }

    pub fn has_missing_fields(&self) -> bool {
        self.email.is_empty()
            || self.password.is_empty()
            || self.name.is_empty()
            || self.invite_code.is_empty()
    }

    /// 只要求字段齐全，不限制密码长度
    pub fn validate(&self) -> Result<(), AppError> {
        if self.has_missing_fields() {
            return Err(AppError::Validation("缺少必填字段".into()));
        }
        Ok(())
    }
}

impl User {
    /// 使用邀请码注册：检查邮箱、占用邀请码、创建用户在同一事务内完成
    pub async fn register(
        pool: &PgPool,
        req: &RegisterRequest,
        password_hash: String,
    ) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1")
                .bind(&req.email)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("邮箱已注册".into()));
        }

        let invite_code_id: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE invite_codes
            SET used = TRUE
            WHERE code = $1 AND used = FALSE
            RETURNING id
            "#,
        )
        .bind(&req.invite_code)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(invite_code_id) = invite_code_id else {
            return Err(AppError::Validation("邀请码无效或已被使用".into()));
        };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (user_id, email, name, password_hash, invite_code_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&req.email)
        .bind(&req.name)
        .bind(password_hash)
        .bind(invite_code_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique_violation {
                AppError::Conflict("邮箱已注册".into())
            } else {
                AppError::from(e)
            }
        })?;

        tx.commit().await?;

        tracing::info!("Registered user: {}", user.user_id);
        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
