use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{command_argument, token_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::presenter::token_presenter::TokenPresenter;

pub struct TokensCommand;

impl CommandHandler for TokensCommand {
    fn command_name() -> &'static str {
        "tokens"
    }

    fn description() -> &'static str {
        "list tradable tokens"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Tokens command received from Telegram ID: {}", telegram_id);

        token_presenter(&bot, msg.chat.id, &services)
            .list_tokens()
            .await
    }
}

pub struct SearchCommand;

impl CommandHandler for SearchCommand {
    fn command_name() -> &'static str {
        "search"
    }

    fn description() -> &'static str {
        "search tokens by name, symbol or mint"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let query = command_argument(&msg);
        info!("Search '{}' received from Telegram ID: {}", query, telegram_id);

        token_presenter(&bot, msg.chat.id, &services)
            .search_tokens(&query)
            .await
    }
}
