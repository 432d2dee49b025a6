use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TrackingEntry {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub tracking_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrackingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tracking_number: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTrackingsRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteTrackingsResponse {
    pub deleted: u64,
}

impl TrackingEntry {
    /// 当前用户的单号，按创建时间倒序
    pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrackingEntry>(
            r#"
            SELECT id, user_id, name, tracking_number, created_at
            FROM trackings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        name: &str,
        tracking_number: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TrackingEntry>(
            r#"
            INSERT INTO trackings (id, user_id, name, tracking_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, tracking_number, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(name)
        .bind(tracking_number)
        .fetch_one(pool)
        .await
    }

    /// 只删除属于该用户的记录，返回删除条数
    pub async fn delete_for_user(
        pool: &PgPool,
        user_id: &str,
        ids: &[String],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trackings WHERE user_id = $1 AND id = ANY($2)")
            .bind(user_id)
            .bind(ids)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
