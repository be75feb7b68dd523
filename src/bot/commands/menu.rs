//! One-shot menu handlers: start/registration entry, balance lookup, auction
//! lots, and keyboard navigation. Every handler clears the chat's active flow
//! as a side effect of running.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};
use tracing::error;

use crate::bot::session::{Flow, SessionStore};
use crate::bot::texts::{self, buttons};
use crate::database::connection::DatabaseManager;
use crate::database::models::{AuctionLot, User};

/// Main reply keyboard; admins get two extra review/statistics rows.
pub fn main_menu(is_admin: bool) -> KeyboardMarkup {
    let mut rows = vec![
        vec![KeyboardButton::new(buttons::GET_COINS)],
        vec![KeyboardButton::new(buttons::TOTAL_COINS)],
        vec![KeyboardButton::new(buttons::LOTS)],
    ];
    if is_admin {
        rows.push(vec![KeyboardButton::new(buttons::CHECK_GOOD_DEEDS)]);
        rows.push(vec![KeyboardButton::new(buttons::STATISTICS)]);
    }
    KeyboardMarkup::new(rows).resize_keyboard(true)
}

/// Submenu listing the ways to earn coins.
pub fn earn_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(buttons::ATTEND_EVENT)],
        vec![KeyboardButton::new(buttons::GOOD_DEED)],
        vec![KeyboardButton::new(buttons::QUIZ)],
        vec![KeyboardButton::new(buttons::BACK)],
    ])
    .resize_keyboard(true)
}

/// `/start`: known users get the main menu; unknown users enter the
/// registration flow.
pub async fn handle_start(
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

    let lookup = async {
        let user = User::find_by_login(&db.pool, &login).await?;
        let is_admin = User::is_admin(&db.pool, &login).await?;
        Ok::<_, sqlx::Error>((user, is_admin))
    }
    .await;

    match lookup {
        Ok((Some(_), is_admin)) => {
            bot.send_message(chat_id, texts::WELCOME)
                .reply_markup(main_menu(is_admin))
                .await?;
        }
        Ok((None, _)) => {
            sessions.set_flow(chat_id, Flow::Registration).await;
            bot.send_message(chat_id, texts::NOT_REGISTERED).await?;
        }
        Err(e) => {
            error!("Failed to check registration for {}: {}", login, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// "Назад": back to the main menu.
pub async fn handle_back(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let login = msg.from().and_then(|u| u.username.clone()).unwrap_or_default();
    let is_admin = match User::is_admin(&db.pool, &login).await {
        Ok(is_admin) => is_admin,
        Err(e) => {
            error!("Failed to check admin status for {}: {}", login, e);
            false
        }
    };

    bot.send_message(chat_id, texts::SELECT_ACTION)
        .reply_markup(main_menu(is_admin))
        .await?;
    Ok(())
}

/// "Получить доброкоины": show the earn submenu.
pub async fn handle_earn_menu(
    bot: Bot,
    msg: Message,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    sessions.reset(msg.chat.id).await;
    bot.send_message(msg.chat.id, texts::SELECT_ACTION)
        .reply_markup(earn_menu())
        .await?;
    Ok(())
}

/// "Сколько у меня доброкоинов": balance lookup.
pub async fn handle_balance(
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

    match User::coins(&db.pool, &login).await {
        Ok(coins) => {
            bot.send_message(chat_id, texts::total_coins(coins)).await?;
        }
        Err(e) => {
            error!("Failed to fetch balance for {}: {}", login, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// "Лоты на аукционе": photo listing of every auction lot.
pub async fn handle_lots(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let lots = match AuctionLot::all(&db.pool).await {
        Ok(lots) => lots,
        Err(e) => {
            error!("Failed to load auction lots: {}", e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    if lots.is_empty() {
        bot.send_message(chat_id, texts::NO_LOTS).await?;
        return Ok(());
    }

    for lot in lots {
        bot.send_photo(chat_id, teloxide::types::InputFile::file_id(lot.photo_id.clone()))
            .caption(lot.caption())
            .await?;
    }
    Ok(())
}
