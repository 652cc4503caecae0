use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode};

use super::{swap_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::wallet_interactor::{WalletInteractor, WalletInteractorImpl};
use crate::presenter::swap_presenter::SwapPresenter;

pub struct StartCommand;

impl CommandHandler for StartCommand {
    fn command_name() -> &'static str {
        "start"
    }

    fn description() -> &'static str {
        "open a fresh swap card"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Start command received from Telegram ID: {}", telegram_id);

        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        let wallets = WalletInteractorImpl::new(services.sessions());
        let greeting = if wallets.public_key(chat_id).is_some() {
            "<b>Welcome back!</b> Here is a fresh swap card."
        } else {
            "<b>Hello!</b> I swap Solana tokens through Jupiter.\n\
            Connect a wallet with /connect, then send an amount to get a quote."
        };
        bot.send_message(chat_id, greeting)
            .parse_mode(ParseMode::Html)
            .await?;

        swap_presenter(&bot, chat_id, &services)
            .show_card(chat_id, true)
            .await
    }
}
