pub mod admin;
pub mod menu;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "Показать справку")]
    Help,
    #[command(description = "Начать работу с ботом")]
    Start,
}
