use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review status of a good-deed submission.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GoodDeed {
    pub id: i64,
    pub telegram_login: String,
    pub photo_id: String,
    pub description: String,
    pub status: String,
    pub created_date: String,
    pub created_at: String,
}

impl GoodDeed {
    /// Number of submissions a user has made on the given calendar date,
    /// regardless of review status. Backs the daily cap check.
    pub async fn count_for_date(
        pool: &sqlx::SqlitePool,
        login: &str,
        date: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM good_deeds \
             WHERE LOWER(telegram_login) = LOWER(?) AND created_date = ?",
        )
        .bind(login)
        .bind(date)
        .fetch_one(pool)
        .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        login: &str,
        photo_id: &str,
        description: &str,
        date: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO good_deeds (telegram_login, photo_id, description, status, created_date, created_at) \
             VALUES (LOWER(?), ?, ?, ?, ?, ?)",
        )
        .bind(login)
        .bind(photo_id)
        .bind(description)
        .bind(status::PENDING)
        .bind(date)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Submissions awaiting admin review, oldest first.
    pub async fn pending(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, GoodDeed>(
            "SELECT id, telegram_login, photo_id, description, status, created_date, created_at \
             FROM good_deeds WHERE status = ? ORDER BY id",
        )
        .bind(status::PENDING)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, GoodDeed>(
            "SELECT id, telegram_login, photo_id, description, status, created_date, created_at \
             FROM good_deeds WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Moves a pending submission to `new_status`. Returns `false` when the
    /// deed was not pending anymore, so repeated review presses cannot credit
    /// a deed twice.
    pub async fn transition_from_pending(
        pool: &sqlx::SqlitePool,
        id: i64,
        new_status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE good_deeds SET status = ? WHERE id = ? AND status = ?")
            .bind(new_status)
            .bind(id)
            .bind(status::PENDING)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
