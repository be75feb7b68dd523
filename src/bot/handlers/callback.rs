use teloxide::prelude::*;
use tracing::info;

use crate::bot::commands::admin;
use crate::bot::quiz;
use crate::bot::session::SessionStore;
use crate::database::connection::DatabaseManager;

/// Routes callback queries by data prefix: quiz answers and good-deed review
/// actions. Anything else is acknowledged and dropped.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    db: DatabaseManager,
    sessions: SessionStore,
) -> ResponseResult<()> {
    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let username = q.from.username.as_deref().unwrap_or("unknown");
    info!("Callback '{}' from {}", data, username);

    if let Some(answer) = data.strip_prefix(quiz::CALLBACK_PREFIX) {
        return quiz::handle_answer(bot, q, answer, &db, &sessions).await;
    }

    if let Some(payload) = data.strip_prefix(admin::CALLBACK_PREFIX) {
        if let Some((action, deed_id)) = admin::parse_review_callback(payload) {
            return admin::handle_review_action(bot, q, action, deed_id, &db).await;
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}
