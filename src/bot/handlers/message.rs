use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{admin, menu, Command};
use crate::bot::session::SessionStore;
use crate::bot::texts::buttons;
use crate::bot::{flows, quiz};
use crate::database::connection::DatabaseManager;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db: DatabaseManager,
    sessions: SessionStore,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            sessions.reset(msg.chat.id).await;
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            menu::handle_start(bot, msg, &db, &sessions).await?;
        }
    }
    Ok(())
}

/// Dispatches free-form messages: reply-keyboard button labels first (they
/// work even while a flow is active), then the chat's active flow.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    db: DatabaseManager,
    sessions: SessionStore,
) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        match text {
            buttons::BACK => return menu::handle_back(bot, msg, &db, &sessions).await,
            buttons::GET_COINS => return menu::handle_earn_menu(bot, msg, &sessions).await,
            buttons::TOTAL_COINS => return menu::handle_balance(bot, msg, &db, &sessions).await,
            buttons::LOTS => return menu::handle_lots(bot, msg, &db, &sessions).await,
            buttons::CHECK_GOOD_DEEDS => {
                return admin::handle_review_queue(bot, msg, &db, &sessions).await
            }
            buttons::STATISTICS => return admin::handle_statistics(bot, msg, &db, &sessions).await,
            buttons::ATTEND_EVENT => return flows::begin_attend_event(bot, msg, &sessions).await,
            buttons::GOOD_DEED => return flows::begin_good_deed(bot, msg, &db, &sessions).await,
            buttons::QUIZ => return quiz::start(bot, msg, &db, &sessions).await,
            _ => {}
        }
    }

    flows::handle_event(bot, msg, &db, &sessions).await
}
