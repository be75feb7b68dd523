use anyhow::Result;
use dobrocoin_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

async fn seed_admin(pool: &sqlx::SqlitePool, login: &str) -> Result<()> {
    sqlx::query("INSERT INTO admins (telegram_login) VALUES (?)")
        .bind(login)
        .execute(pool)
        .await?;
    Ok(())
}

async fn seed_code(pool: &sqlx::SqlitePool, word: &str) -> Result<()> {
    sqlx::query("INSERT INTO codes (code_word) VALUES (?)")
        .bind(word)
        .execute(pool)
        .await?;
    Ok(())
}

async fn seed_question(
    pool: &sqlx::SqlitePool,
    date: &str,
    question: &str,
    options: [Option<&str>; 4],
    correct: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO quiz_questions (quiz_date, question, option_a, option_b, option_c, option_d, correct_answer) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(date)
    .bind(question)
    .bind(options[0])
    .bind(options[1])
    .bind(options[2])
    .bind(options[3])
    .bind(correct)
    .execute(pool)
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_user_creation_and_lookup() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let user = User::create(&db.pool, "ivan_p", "Иван Петров", 6).await?;
    assert_eq!(user.telegram_login, "ivan_p");
    assert_eq!(user.full_name, "Иван Петров");
    assert_eq!(user.volunteer_experience, 6);
    assert_eq!(user.coins, 0);

    // Login comparison is case-insensitive
    let found = User::find_by_login(&db.pool, "IVAN_P").await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().id, user.id);

    Ok(())
}

#[tokio::test]
async fn test_unknown_user_lookup_and_balance() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert!(User::find_by_login(&db.pool, "nobody").await?.is_none());
    assert_eq!(User::coins(&db.pool, "nobody").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_coin_adjustment_and_totals() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    User::create(&db.pool, "ivan_p", "Иван Петров", 6).await?;
    User::create(&db.pool, "anna_s", "Анна Сидорова", 12).await?;

    User::adjust_coins(&db.pool, "ivan_p", 50).await?;
    User::adjust_coins(&db.pool, "IVAN_P", 20).await?;
    User::adjust_coins(&db.pool, "anna_s", 100).await?;

    assert_eq!(User::coins(&db.pool, "ivan_p").await?, 70);

    let totals = User::totals(&db.pool).await?;
    assert_eq!(totals.total_experience, 18);
    assert_eq!(totals.total_coins, 170);

    let leaderboard = User::all_by_coins(&db.pool).await?;
    assert_eq!(leaderboard[0].telegram_login, "anna_s");
    assert_eq!(leaderboard[1].telegram_login, "ivan_p");

    Ok(())
}

#[tokio::test]
async fn test_admin_status_lookup() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    seed_admin(&db.pool, "chief").await?;

    assert!(User::is_admin(&db.pool, "chief").await?);
    assert!(User::is_admin(&db.pool, "CHIEF").await?);
    assert!(!User::is_admin(&db.pool, "ivan_p").await?);

    Ok(())
}

#[tokio::test]
async fn test_code_lookup_is_case_insensitive() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    seed_code(&db.pool, "Добро").await?;

    let code = Code::find_valid(&db.pool, "добро").await?;
    assert!(code.is_some());
    assert_eq!(code.unwrap().code_word, "Добро");

    assert!(Code::find_valid(&db.pool, "зло").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_code_usage_tracking() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    seed_code(&db.pool, "Добро").await?;

    assert!(!Code::was_used(&db.pool, "ivan_p", "Добро").await?);
    Code::mark_used(&db.pool, "ivan_p", "Добро").await?;
    assert!(Code::was_used(&db.pool, "ivan_p", "Добро").await?);

    // Usage is per-user
    assert!(!Code::was_used(&db.pool, "anna_s", "Добро").await?);

    let log = UsedCode::log(&db.pool).await?;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].code_word, "Добро");

    Ok(())
}

#[tokio::test]
async fn test_questions_for_date_in_insertion_order() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let date = "2024-06-01";
    seed_question(&db.pool, date, "Второй?", [Some("1"), Some("2"), None, None], "B").await?;
    seed_question(&db.pool, date, "Первый?", [Some("1"), Some("2"), Some("3"), Some("4")], "A").await?;
    seed_question(&db.pool, "2024-06-02", "Другой день?", [Some("1"), Some("2"), None, None], "A").await?;

    let questions = QuizQuestion::for_date(&db.pool, date).await?;
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].question, "Второй?");
    assert_eq!(questions[1].question, "Первый?");

    assert!(QuizQuestion::for_date(&db.pool, "2024-06-03").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_questions_with_one_option_are_dropped() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let date = "2024-06-01";
    seed_question(&db.pool, date, "Один вариант?", [Some("1"), None, None, None], "A").await?;
    seed_question(&db.pool, date, "Нормальный?", [Some("1"), Some("2"), None, None], "A").await?;

    let questions = QuizQuestion::for_date(&db.pool, date).await?;
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question, "Нормальный?");

    Ok(())
}

#[tokio::test]
async fn test_quiz_attempt_recording() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let date = "2024-06-01";
    assert!(!QuizAttempt::exists(&db.pool, "ivan_p", date).await?);

    QuizAttempt::record(&db.pool, "ivan_p", date, 2).await?;
    assert!(QuizAttempt::exists(&db.pool, "ivan_p", date).await?);
    assert!(QuizAttempt::exists(&db.pool, "IVAN_P", date).await?);
    assert!(!QuizAttempt::exists(&db.pool, "ivan_p", "2024-06-02").await?);

    let attempt = QuizAttempt::find(&db.pool, "ivan_p", date).await?;
    assert_eq!(attempt.unwrap().correct_answers_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_good_deed_submission_and_daily_count() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let date = "2024-06-01";
    assert_eq!(GoodDeed::count_for_date(&db.pool, "ivan_p", date).await?, 0);

    GoodDeed::create(&db.pool, "ivan_p", "photo-1", "Помог соседям", date).await?;
    GoodDeed::create(&db.pool, "ivan_p", "photo-2", "Без описания", date).await?;
    GoodDeed::create(&db.pool, "ivan_p", "photo-3", "Другой день", "2024-06-02").await?;

    assert_eq!(GoodDeed::count_for_date(&db.pool, "ivan_p", date).await?, 2);
    assert_eq!(GoodDeed::count_for_date(&db.pool, "anna_s", date).await?, 0);

    let pending = GoodDeed::pending(&db.pool).await?;
    assert_eq!(pending.len(), 3);
    assert_eq!(pending[0].description, "Помог соседям");
    assert_eq!(pending[0].status, good_deed::status::PENDING);

    Ok(())
}

#[tokio::test]
async fn test_good_deed_review_transition_is_single_shot() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    GoodDeed::create(&db.pool, "ivan_p", "photo-1", "Помог соседям", "2024-06-01").await?;
    let deed = &GoodDeed::pending(&db.pool).await?[0];

    let moved = GoodDeed::transition_from_pending(&db.pool, deed.id, good_deed::status::APPROVED).await?;
    assert!(moved);

    // A second transition attempt finds nothing pending
    let moved_again =
        GoodDeed::transition_from_pending(&db.pool, deed.id, good_deed::status::REJECTED).await?;
    assert!(!moved_again);

    let reloaded = GoodDeed::find_by_id(&db.pool, deed.id).await?.unwrap();
    assert_eq!(reloaded.status, good_deed::status::APPROVED);
    assert!(GoodDeed::pending(&db.pool).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_auction_lots_listing() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    sqlx::query("INSERT INTO auction_lots (photo_id, title, description) VALUES (?, ?, ?)")
        .bind("photo-lot")
        .bind("Кружка")
        .bind("Фирменная кружка/nс логотипом")
        .execute(&db.pool)
        .await?;

    let lots = AuctionLot::all(&db.pool).await?;
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].caption(), "Кружка\n\nФирменная кружка\nс логотипом");

    Ok(())
}
