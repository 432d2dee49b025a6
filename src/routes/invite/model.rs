use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// 邀请码长度
const INVITE_CODE_LEN: usize = 10;

#[derive(Debug, Serialize, FromRow)]
pub struct InviteCode {
    pub id: String,
    pub code: String,
    pub used: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GenerateInviteResponse {
    pub code: String,
}

impl InviteCode {
    pub async fn issuer_is_admin(pool: &PgPool, user_id: &str) -> Result<bool, sqlx::Error> {
        let is_admin: Option<bool> =
            sqlx::query_scalar("SELECT is_admin FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(is_admin.unwrap_or(false))
    }

    pub async fn create(pool: &PgPool, created_by: &str) -> Result<Self, sqlx::Error> {
        let code = nanoid::nanoid!(INVITE_CODE_LEN);

        sqlx::query_as::<_, InviteCode>(
            r#"
            INSERT INTO invite_codes (id, code, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, code, used, created_by, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(code)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }
}
