//! Admin-only handlers: the good-deed review queue and program statistics
//! with CSV exports. Admin status is looked up fresh on every request.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile};
use tracing::{error, info, warn};

use crate::bot::session::SessionStore;
use crate::bot::texts::{self, buttons};
use crate::database::connection::DatabaseManager;
use crate::database::models::{good_deed::status, GoodDeed, UsedCode, User};

/// Coins credited to the submitter when a good deed is approved.
pub const GOOD_DEED_REWARD: i64 = 30;

/// Callback data prefix for review buttons, `deed:confirm:<id>` /
/// `deed:reject:<id>`.
pub const CALLBACK_PREFIX: &str = "deed:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Confirm,
    Reject,
}

/// Parses the payload after [`CALLBACK_PREFIX`].
pub fn parse_review_callback(payload: &str) -> Option<(ReviewAction, i64)> {
    let (action, id) = payload.split_once(':')?;
    let action = match action {
        "confirm" => ReviewAction::Confirm,
        "reject" => ReviewAction::Reject,
        _ => return None,
    };
    Some((action, id.parse().ok()?))
}

fn review_keyboard(deed_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            buttons::CONFIRM_GOOD_DEED,
            format!("{CALLBACK_PREFIX}confirm:{deed_id}"),
        ),
        InlineKeyboardButton::callback(
            buttons::REJECT_GOOD_DEED,
            format!("{CALLBACK_PREFIX}reject:{deed_id}"),
        ),
    ]])
}

async fn require_admin(
    bot: &Bot,
    chat_id: ChatId,
    login: Option<&str>,
    db: &DatabaseManager,
) -> ResponseResult<bool> {
    let is_admin = match login {
        Some(login) => User::is_admin(&db.pool, login).await.unwrap_or_else(|e| {
            error!("Failed to check admin status for {}: {}", login, e);
            false
        }),
        None => false,
    };
    if !is_admin {
        bot.send_message(chat_id, texts::INSUFFICIENT_PERMISSIONS).await?;
    }
    Ok(is_admin)
}

/// "Проверка добрых дел": sends every pending submission as a photo with
/// confirm/reject buttons.
pub async fn handle_review_queue(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let login = msg.from().and_then(|u| u.username.as_deref());
    if !require_admin(&bot, chat_id, login, db).await? {
        return Ok(());
    }

    let deeds = match GoodDeed::pending(&db.pool).await {
        Ok(deeds) => deeds,
        Err(e) => {
            error!("Failed to load pending good deeds: {}", e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    if deeds.is_empty() {
        bot.send_message(chat_id, texts::NO_GOOD_DEEDS_PENDING).await?;
        return Ok(());
    }

    for deed in deeds {
        bot.send_photo(chat_id, InputFile::file_id(deed.photo_id.clone()))
            .caption(texts::good_deed_review_caption(
                &deed.telegram_login,
                deed.id,
                &deed.description,
            ))
            .reply_markup(review_keyboard(deed.id))
            .await?;
    }
    Ok(())
}

/// Handles a confirm/reject button press on a review message. Approval
/// credits the submitter; either way the review message is removed
/// best-effort. A deed that is no longer pending is reported as not found,
/// which makes double presses harmless.
pub async fn handle_review_action(
    bot: Bot,
    q: CallbackQuery,
    action: ReviewAction,
    deed_id: i64,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message else {
        return Ok(());
    };
    let chat_id = message.chat.id;

    if !require_admin(&bot, chat_id, q.from.username.as_deref(), db).await? {
        return Ok(());
    }

    let new_status = match action {
        ReviewAction::Confirm => status::APPROVED,
        ReviewAction::Reject => status::REJECTED,
    };

    let outcome = async {
        let Some(deed) = GoodDeed::find_by_id(&db.pool, deed_id).await? else {
            return Ok(None);
        };
        if !GoodDeed::transition_from_pending(&db.pool, deed_id, new_status).await? {
            return Ok(None);
        }
        if action == ReviewAction::Confirm {
            User::adjust_coins(&db.pool, &deed.telegram_login, GOOD_DEED_REWARD).await?;
        }
        Ok::<_, sqlx::Error>(Some(deed))
    }
    .await;

    match outcome {
        Ok(Some(deed)) => {
            info!(
                "Good deed {} by {} {}",
                deed_id, deed.telegram_login, new_status
            );
            if let Err(e) = bot.delete_message(chat_id, message.id).await {
                warn!("Failed to delete review message in chat {}: {}", chat_id, e);
            }
            let reply = match action {
                ReviewAction::Confirm => texts::good_deed_confirmed(deed_id),
                ReviewAction::Reject => texts::good_deed_rejected(deed_id),
            };
            bot.send_message(chat_id, reply).await?;
        }
        Ok(None) => {
            bot.send_message(chat_id, texts::GOOD_DEED_NOT_FOUND).await?;
        }
        Err(e) => {
            error!("Failed to review good deed {}: {}", deed_id, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// "Общая статистика": totals message plus CSV exports of the leaderboard
/// and the code-redemption log.
pub async fn handle_statistics(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let login = msg.from().and_then(|u| u.username.as_deref());
    if !require_admin(&bot, chat_id, login, db).await? {
        return Ok(());
    }

    let gathered = async {
        let totals = User::totals(&db.pool).await?;
        let users = User::all_by_coins(&db.pool).await?;
        let codes = UsedCode::log(&db.pool).await?;
        Ok::<_, sqlx::Error>((totals, users, codes))
    }
    .await;

    let (totals, users, codes) = match gathered {
        Ok(gathered) => gathered,
        Err(e) => {
            error!("Failed to gather statistics: {}", e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    bot.send_message(
        chat_id,
        texts::statistics_summary(totals.total_experience, totals.total_coins),
    )
    .await?;

    bot.send_document(
        chat_id,
        InputFile::memory(users_csv(&users).into_bytes()).file_name("users_statistics.csv"),
    )
    .await?;
    bot.send_document(
        chat_id,
        InputFile::memory(codes_csv(&codes).into_bytes()).file_name("used_codes.csv"),
    )
    .await?;
    Ok(())
}

/// Leaderboard export: login, full name, coins, experience.
pub fn users_csv(users: &[User]) -> String {
    let mut csv = String::from("Логин;ФИО;Баллы;Опыт (месяцев)\n");
    for user in users {
        csv.push_str(&format!(
            "{};{};{};{}\n",
            user.telegram_login, user.full_name, user.coins, user.volunteer_experience
        ));
    }
    csv
}

/// Code-redemption log export.
pub fn codes_csv(codes: &[UsedCode]) -> String {
    let mut csv = String::from("Логин;Кодовое слово;Время использования\n");
    for code in codes {
        csv.push_str(&format!(
            "{};{};{}\n",
            code.telegram_login, code.code_word, code.used_at
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_review_callbacks() {
        assert_eq!(
            parse_review_callback("confirm:42"),
            Some((ReviewAction::Confirm, 42))
        );
        assert_eq!(
            parse_review_callback("reject:7"),
            Some((ReviewAction::Reject, 7))
        );
    }

    #[test]
    fn rejects_malformed_review_callbacks() {
        assert_eq!(parse_review_callback("confirm"), None);
        assert_eq!(parse_review_callback("approve:42"), None);
        assert_eq!(parse_review_callback("confirm:abc"), None);
        assert_eq!(parse_review_callback(""), None);
    }

    #[test]
    fn users_csv_has_header_and_rows() {
        let users = vec![User {
            id: 1,
            telegram_login: "ivan".to_string(),
            full_name: "Иван Петров".to_string(),
            volunteer_experience: 6,
            coins: 90,
            created_at: "2024-06-01T00:00:00+00:00".to_string(),
        }];
        let csv = users_csv(&users);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Логин;ФИО;Баллы;Опыт (месяцев)"));
        assert_eq!(lines.next(), Some("ivan;Иван Петров;90;6"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn codes_csv_lists_redemptions() {
        let codes = vec![UsedCode {
            id: 1,
            telegram_login: "ivan".to_string(),
            code_word: "добро".to_string(),
            used_at: "2024-06-01T12:00:00+00:00".to_string(),
        }];
        let csv = codes_csv(&codes);
        assert!(csv.contains("ivan;добро;2024-06-01T12:00:00+00:00"));
    }
}
