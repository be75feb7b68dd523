use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Code {
    pub id: i64,
    pub code_word: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UsedCode {
    pub id: i64,
    pub telegram_login: String,
    pub code_word: String,
    pub used_at: String,
}

impl Code {
    /// Looks up a redeemable code word, case-insensitively. SQLite's LOWER()
    /// folds ASCII only, so the Unicode-aware comparison happens here; the
    /// code table is tiny. The returned record carries the canonical spelling
    /// stored in the table.
    pub async fn find_valid(
        pool: &sqlx::SqlitePool,
        code_word: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let needle = code_word.trim().to_lowercase();
        let codes = sqlx::query_as::<_, Code>("SELECT id, code_word FROM codes")
            .fetch_all(pool)
            .await?;
        Ok(codes
            .into_iter()
            .find(|code| code.code_word.to_lowercase() == needle))
    }

    pub async fn was_used(
        pool: &sqlx::SqlitePool,
        login: &str,
        code_word: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM used_codes \
             WHERE LOWER(telegram_login) = LOWER(?) AND code_word = ? LIMIT 1",
        )
        .bind(login)
        .bind(code_word)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn mark_used(
        pool: &sqlx::SqlitePool,
        login: &str,
        code_word: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO used_codes (telegram_login, code_word, used_at) VALUES (LOWER(?), ?, ?)",
        )
        .bind(login)
        .bind(code_word)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }
}

impl UsedCode {
    /// Full redemption log, most recent first, for the statistics export.
    pub async fn log(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UsedCode>(
            "SELECT id, telegram_login, code_word, used_at FROM used_codes ORDER BY used_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
