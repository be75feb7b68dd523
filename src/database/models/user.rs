use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_login: String,
    pub full_name: String,
    pub volunteer_experience: i64, // months
    pub coins: i64,
    pub created_at: String,
}

/// Aggregate totals across all registered volunteers, used by admin statistics.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct UserTotals {
    pub total_experience: i64,
    pub total_coins: i64,
}

impl User {
    pub async fn find_by_login(
        pool: &sqlx::SqlitePool,
        login: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, telegram_login, full_name, volunteer_experience, coins, created_at \
             FROM users WHERE LOWER(telegram_login) = LOWER(?)",
        )
        .bind(login)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        login: &str,
        full_name: &str,
        experience_months: i64,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (telegram_login, full_name, volunteer_experience, coins, created_at) \
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(login)
        .bind(full_name)
        .bind(experience_months)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_login(pool, login)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Checks the admin list. Always queried fresh per request; admin status
    /// is never cached across calls.
    pub async fn is_admin(pool: &sqlx::SqlitePool, login: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admins WHERE LOWER(telegram_login) = LOWER(?)",
        )
        .bind(login)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Current coin balance, 0 for unknown logins.
    pub async fn coins(pool: &sqlx::SqlitePool, login: &str) -> Result<i64, sqlx::Error> {
        let coins: Option<i64> = sqlx::query_scalar(
            "SELECT coins FROM users WHERE LOWER(telegram_login) = LOWER(?) LIMIT 1",
        )
        .bind(login)
        .fetch_optional(pool)
        .await?;
        Ok(coins.unwrap_or(0))
    }

    /// Credits or debits a balance. Generic over the executor so it can run
    /// inside a transaction alongside the operation that earned the coins.
    pub async fn adjust_coins<'e, E>(executor: E, login: &str, delta: i64) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query("UPDATE users SET coins = coins + ? WHERE LOWER(telegram_login) = LOWER(?)")
            .bind(delta)
            .bind(login)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn totals(pool: &sqlx::SqlitePool) -> Result<UserTotals, sqlx::Error> {
        sqlx::query_as::<_, UserTotals>(
            "SELECT COALESCE(SUM(volunteer_experience), 0) AS total_experience, \
                    COALESCE(SUM(coins), 0) AS total_coins \
             FROM users",
        )
        .fetch_one(pool)
        .await
    }

    /// All users ordered by coin balance descending, for the statistics export.
    pub async fn all_by_coins(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, telegram_login, full_name, volunteer_experience, coins, created_at \
             FROM users ORDER BY coins DESC",
        )
        .fetch_all(pool)
        .await
    }
}
