//! Interactive flow engine.
//!
//! Routes an inbound message for a chat whose session has an active flow:
//! registration text, event code words, and good-deed photo uploads. Quiz
//! events arrive as callback queries and are handled in [`crate::bot::quiz`].

use teloxide::prelude::*;
use tracing::{error, info};

use crate::bot::commands::menu;
use crate::bot::session::{Flow, SessionStore};
use crate::bot::texts;
use crate::database::connection::DatabaseManager;
use crate::database::models::{Code, GoodDeed, User};
use crate::utils::datetime::today_string;
use crate::utils::validation::{normalize_code_word, parse_registration};

/// Coins credited for redeeming an event code word.
pub const CODE_REWARD: i64 = 50;

/// Maximum good-deed submissions per user per calendar day.
pub const DAILY_DEED_CAP: i64 = 10;

/// Routes one free-form message according to the chat's active flow. Messages
/// outside any flow are ignored to avoid spam replies.
pub async fn handle_event(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let (flow, lapsed) = sessions.current_flow(chat_id).await;
    if lapsed {
        bot.send_message(chat_id, texts::FLOW_LAPSED).await?;
        return Ok(());
    }

    match flow {
        Flow::Idle | Flow::Quiz(_) => Ok(()),
        Flow::Registration => handle_registration(bot, msg, db, sessions).await,
        Flow::AttendEvent => handle_code_word(bot, msg, db, sessions).await,
        Flow::UploadGoodDeed => handle_deed_photo(bot, msg, db, sessions).await,
    }
}

/// Enters the attend-event flow; the next text message is treated as a code
/// word.
pub async fn begin_attend_event(
    bot: Bot,
    msg: Message,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    sessions.set_flow(msg.chat.id, Flow::AttendEvent).await;
    bot.send_message(msg.chat.id, texts::ENTER_CODE_WORD).await?;
    Ok(())
}

/// Enters the good-deed upload flow, unless the user already hit the daily
/// submission cap.
pub async fn begin_good_deed(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let Some(login) = msg.from().and_then(|u| u.username.clone()) else {
        bot.send_message(chat_id, texts::MISSING_USERNAME).await?;
        return Ok(());
    };

    let today = today_string();
    match GoodDeed::count_for_date(&db.pool, &login, &today).await {
        Ok(count) if count >= DAILY_DEED_CAP => {
            bot.send_message(chat_id, texts::MAX_GOOD_DEEDS).await?;
        }
        Ok(_) => {
            sessions.set_flow(chat_id, Flow::UploadGoodDeed).await;
            bot.send_message(chat_id, texts::UPLOAD_GOOD_DEED_PHOTO).await?;
        }
        Err(e) => {
            error!("Failed to count good deeds for {}: {}", login, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// Registration: expects "Фамилия Имя N месяцев". Invalid input keeps the
/// flow active for a retry; success creates the user and shows the main menu.
async fn handle_registration(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let Some(login) = msg.from().and_then(|u| u.username.clone()) else {
        bot.send_message(chat_id, texts::MISSING_USERNAME).await?;
        return Ok(());
    };

    let Some(parsed) = msg.text().and_then(parse_registration) else {
        bot.send_message(chat_id, texts::INVALID_REGISTRATION).await?;
        return Ok(());
    };

    match User::create(&db.pool, &login, &parsed.full_name, parsed.experience_months).await {
        Ok(user) => {
            info!("Registered volunteer {} ({})", user.full_name, login);
            sessions.reset(chat_id).await;
            let is_admin = match User::is_admin(&db.pool, &login).await {
                Ok(is_admin) => is_admin,
                Err(e) => {
                    error!("Failed to check admin status for {}: {}", login, e);
                    false
                }
            };
            bot.send_message(chat_id, texts::REGISTERED)
                .reply_markup(menu::main_menu(is_admin))
                .await?;
        }
        Err(e) => {
            error!("Failed to register {}: {}", login, e);
            sessions.reset(chat_id).await;
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// Attend-event: a single redemption attempt, then back to idle regardless of
/// the outcome.
async fn handle_code_word(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let Some(login) = msg.from().and_then(|u| u.username.clone()) else {
        bot.send_message(chat_id, texts::MISSING_USERNAME).await?;
        return Ok(());
    };

    let Some(text) = msg.text() else {
        bot.send_message(chat_id, texts::INVALID_CODE_WORD).await?;
        return Ok(());
    };
    let word = normalize_code_word(text);

    match redeem_code(&db.pool, &login, &word).await {
        Ok(Redemption::Credited { total }) => {
            info!("{} redeemed code '{}'", login, word);
            bot.send_message(chat_id, texts::total_coins(total)).await?;
        }
        Ok(Redemption::AlreadyUsed) => {
            bot.send_message(chat_id, texts::CODE_ALREADY_USED).await?;
        }
        Ok(Redemption::Unknown) => {
            bot.send_message(chat_id, texts::INVALID_CODE_WORD).await?;
        }
        Err(e) => {
            error!("Failed to redeem code for {}: {}", login, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// Outcome of a code-word redemption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    Credited { total: i64 },
    AlreadyUsed,
    Unknown,
}

/// Redeems a code word for a user: a valid, previously unused code credits
/// [`CODE_REWARD`] coins and is marked used for that user.
pub async fn redeem_code(
    pool: &sqlx::SqlitePool,
    login: &str,
    word: &str,
) -> Result<Redemption, sqlx::Error> {
    let Some(code) = Code::find_valid(pool, word).await? else {
        return Ok(Redemption::Unknown);
    };
    if Code::was_used(pool, login, &code.code_word).await? {
        return Ok(Redemption::AlreadyUsed);
    }
    User::adjust_coins(pool, login, CODE_REWARD).await?;
    Code::mark_used(pool, login, &code.code_word).await?;
    let total = User::coins(pool, login).await?;
    Ok(Redemption::Credited { total })
}

/// Good-deed upload: waits for a photo, substituting a default caption when
/// absent. Non-photo messages keep the flow active and prompt a retry.
async fn handle_deed_photo(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let Some(login) = msg.from().and_then(|u| u.username.clone()) else {
        bot.send_message(chat_id, texts::MISSING_USERNAME).await?;
        return Ok(());
    };

    let Some(photo_id) = msg
        .photo()
        .and_then(|sizes| sizes.last())
        .map(|photo| photo.file.id.clone())
    else {
        bot.send_message(chat_id, texts::PHOTO_REQUIRED).await?;
        return Ok(());
    };

    let caption = msg.caption().unwrap_or(texts::EMPTY_DEED_DESCRIPTION);
    let today = today_string();

    match GoodDeed::create(&db.pool, &login, &photo_id, caption, &today).await {
        Ok(()) => {
            info!("{} submitted a good deed", login);
            sessions.reset(chat_id).await;
            bot.send_message(chat_id, texts::GOOD_DEED_REGISTERED).await?;
        }
        Err(e) => {
            error!("Failed to store good deed for {}: {}", login, e);
            sessions.reset(chat_id).await;
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}
