pub mod callback;
pub mod message;

use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::Command;
use crate::bot::session::SessionStore;
use crate::database::connection::DatabaseManager;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub struct BotHandler {
    pub db: DatabaseManager,
    pub sessions: SessionStore,
}

impl BotHandler {
    pub fn new(db: DatabaseManager, sessions: SessionStore) -> Self {
        Self { db, sessions }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        use teloxide::dispatching::UpdateFilterExt;

        let db_command = self.db.clone();
        let sessions_command = self.sessions.clone();
        let db_message = self.db.clone();
        let sessions_message = self.sessions.clone();
        let db_callback = self.db.clone();
        let sessions_callback = self.sessions.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let db = db_command.clone();
                        let sessions = sessions_command.clone();
                        async move {
                            message::command_handler(bot, msg, cmd, db, sessions)
                                .await
                                .map_err(HandlerError::from)
                        }
                    }),
            )
            .branch(
                Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                    let db = db_message.clone();
                    let sessions = sessions_message.clone();
                    async move {
                        message::message_handler(bot, msg, db, sessions)
                            .await
                            .map_err(HandlerError::from)
                    }
                }),
            )
            .branch(
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let db = db_callback.clone();
                    let sessions = sessions_callback.clone();
                    async move {
                        callback::callback_handler(bot, q, db, sessions)
                            .await
                            .map_err(HandlerError::from)
                    }
                }),
            )
    }
}
