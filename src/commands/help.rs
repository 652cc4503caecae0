use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands as _};

use super::{BotCommands, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;

pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    fn command_name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "display this help message"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        bot.send_message(
            msg.chat.id,
            format!(
                "{}\n\n\
                Any plain number you send becomes the amount to sell.\n\
                The card buttons pick tokens, flip the pair, refresh the quote and swap.",
                BotCommands::descriptions()
            ),
        )
        .await?;

        Ok(())
    }
}
