use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

/// One quiz question for a given calendar date. A question carries between
/// two and four answer options; absent options are NULL in the table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub quiz_date: String,
    pub question: String,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub telegram_login: String,
    pub quiz_date: String,
    pub correct_answers_count: i64,
    pub created_at: String,
}

impl QuizQuestion {
    /// Questions configured for `date`, in insertion order. Rows with fewer
    /// than two usable options cannot be presented and are dropped with a
    /// warning.
    pub async fn for_date(
        pool: &sqlx::SqlitePool,
        date: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, QuizQuestion>(
            "SELECT id, quiz_date, question, option_a, option_b, option_c, option_d, correct_answer \
             FROM quiz_questions WHERE quiz_date = ? ORDER BY id",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter(|q| {
                let presentable = q.options().len() >= 2;
                if !presentable {
                    warn!("Skipping quiz question {} with fewer than two options", q.id);
                }
                presentable
            })
            .collect())
    }

    /// Present options with their labels, in A-D order.
    pub fn options(&self) -> Vec<(&'static str, &str)> {
        [
            ("A", &self.option_a),
            ("B", &self.option_b),
            ("C", &self.option_c),
            ("D", &self.option_d),
        ]
        .into_iter()
        .filter_map(|(label, opt)| {
            opt.as_deref()
                .filter(|text| !text.trim().is_empty())
                .map(|text| (label, text))
        })
        .collect()
    }
}

impl QuizAttempt {
    pub async fn exists(
        pool: &sqlx::SqlitePool,
        login: &str,
        date: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_quiz_attempts \
             WHERE LOWER(telegram_login) = LOWER(?) AND quiz_date = ?",
        )
        .bind(login)
        .bind(date)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Records the once-per-day attempt row. Generic over the executor so the
    /// insert can share a transaction with the coin credit.
    pub async fn record<'e, E>(
        executor: E,
        login: &str,
        date: &str,
        correct_count: i64,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO user_quiz_attempts (telegram_login, quiz_date, correct_answers_count, created_at) \
             VALUES (LOWER(?), ?, ?, ?)",
        )
        .bind(login)
        .bind(date)
        .bind(correct_count)
        .bind(now)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find(
        pool: &sqlx::SqlitePool,
        login: &str,
        date: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, QuizAttempt>(
            "SELECT id, telegram_login, quiz_date, correct_answers_count, created_at \
             FROM user_quiz_attempts \
             WHERE LOWER(telegram_login) = LOWER(?) AND quiz_date = ?",
        )
        .bind(login)
        .bind(date)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(a: Option<&str>, b: Option<&str>, c: Option<&str>, d: Option<&str>) -> QuizQuestion {
        QuizQuestion {
            id: 1,
            quiz_date: "2024-06-01".to_string(),
            question: "Вопрос?".to_string(),
            option_a: a.map(String::from),
            option_b: b.map(String::from),
            option_c: c.map(String::from),
            option_d: d.map(String::from),
            correct_answer: "A".to_string(),
        }
    }

    #[test]
    fn options_skips_absent_variants() {
        let q = question(Some("один"), None, Some("три"), None);
        let opts = q.options();
        assert_eq!(opts, vec![("A", "один"), ("C", "три")]);
    }

    #[test]
    fn options_keeps_full_set_in_order() {
        let q = question(Some("1"), Some("2"), Some("3"), Some("4"));
        let labels: Vec<_> = q.options().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn options_treats_blank_text_as_absent() {
        let q = question(Some("один"), Some("  "), Some("три"), None);
        assert_eq!(q.options().len(), 2);
    }
}
